//! Slot-level transforms on a single participant.
//!
//! Assignment is deliberately permissive: a player may be placed in any
//! role's slot regardless of their own role tags. Role filtering belongs to
//! whoever offers the candidates.

use crate::{
    formation::Formation,
    model::{Lineup, Participant, Player},
    types::{PlayerId, Role},
};

impl Lineup {
    /// All-empty lineup sized to `formation`.
    pub fn empty(formation: Formation) -> Self {
        let empty = |role| vec![None; formation.count(role)];
        Self {
            gk: empty(Role::GK),
            df: empty(Role::DF),
            md: empty(Role::MD),
            fw: empty(Role::FW),
        }
    }

    /// Clears every slot holding `id`.
    pub fn remove_player(&mut self, id: PlayerId) {
        for role in Role::ALL {
            for slot in self.slots_mut(role).iter_mut() {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
        }
    }

    /// True when `(role, index)` addresses an existing slot.
    pub fn has_slot(&self, role: Role, index: usize) -> bool {
        index < self.slots(role).len()
    }
}

impl Participant {
    /// Places `player` at `(role, index)`, first removing it from any other
    /// slot of this participant. Out-of-range addresses leave the lineup as is.
    pub fn assign_player(&mut self, role: Role, index: usize, player: PlayerId) {
        if !self.lineup.has_slot(role, index) {
            return;
        }
        self.lineup.remove_player(player);
        self.lineup.slots_mut(role)[index] = Some(player);
    }

    /// Empties `(role, index)`. The captain is left alone even if it pointed
    /// at the cleared player.
    pub fn clear_slot(&mut self, role: Role, index: usize) {
        if let Some(slot) = self.lineup.slots_mut(role).get_mut(index) {
            *slot = None;
        }
    }

    /// Switches formation, discarding every assignment and the captain.
    pub fn change_formation(&mut self, formation: Formation) {
        self.formation = formation;
        self.lineup = Lineup::empty(formation);
        self.captain_id = None;
    }

    /// Sets or clears the captain without checking that it is fielded.
    pub fn set_captain(&mut self, captain: Option<PlayerId>) {
        self.captain_id = captain;
    }

    /// Quick-pick target for `player` under their primary role: the first
    /// empty slot, or slot 0 when all are taken. `None` when the formation has
    /// no slot for that role.
    pub fn suggest_slot(&self, player: &Player) -> Option<(Role, usize)> {
        let role = player.primary_role();
        let slots = self.lineup.slots(role);
        if slots.is_empty() {
            return None;
        }
        let index = slots.iter().position(Option::is_none).unwrap_or(0);
        Some((role, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::DEFAULT_FORMATION;

    #[test]
    fn empty_lineup_follows_counts() {
        let f = Formation::parse("1-1-1-2").unwrap();
        let l = Lineup::empty(f);
        assert_eq!(l.gk, vec![None]);
        assert_eq!(l.df, vec![None]);
        assert_eq!(l.md, vec![None]);
        assert_eq!(l.fw, vec![None, None]);
    }

    #[test]
    fn assigning_twice_moves_the_player() {
        let mut p = Participant::new(1, "Lia");
        p.assign_player(Role::FW, 0, 7);
        p.assign_player(Role::DF, 0, 7);
        assert_eq!(p.lineup.fw, vec![None, None]);
        assert_eq!(p.lineup.df, vec![Some(7)]);
    }

    #[test]
    fn out_of_range_assignment_is_ignored() {
        let mut p = Participant::new(1, "Lia");
        p.assign_player(Role::FW, 0, 7);
        p.assign_player(Role::GK, 3, 7);
        assert_eq!(p.lineup.fw, vec![Some(7), None]);
    }

    #[test]
    fn clearing_keeps_captain_reference() {
        let mut p = Participant::new(1, "Lia");
        p.assign_player(Role::MD, 0, 4);
        p.set_captain(Some(4));
        p.clear_slot(Role::MD, 0);
        assert_eq!(p.lineup.md, vec![None]);
        assert_eq!(p.captain_id, Some(4));
    }

    fn player(id: PlayerId, roles: &[Role]) -> Player {
        Player {
            id,
            name: format!("P{id}"),
            roles: roles.to_vec(),
        }
    }

    #[test]
    fn suggest_slot_prefers_first_empty() {
        let striker = player(9, &[Role::FW, Role::MD]);
        let mut p = Participant::new(1, "Lia");
        assert_eq!(p.suggest_slot(&striker), Some((Role::FW, 0)));
        p.assign_player(Role::FW, 0, 3);
        assert_eq!(p.suggest_slot(&striker), Some((Role::FW, 1)));
        p.assign_player(Role::FW, 1, 5);
        assert_eq!(p.suggest_slot(&striker), Some((Role::FW, 0)));

        let keeper = player(2, &[Role::GK]);
        p.change_formation(Formation::parse("0-1-1-3").unwrap());
        assert_eq!(p.suggest_slot(&keeper), None);
        assert_ne!(p.formation, DEFAULT_FORMATION);
    }

    #[test]
    fn roleless_player_is_suggested_a_defender_slot() {
        let p = Participant::new(1, "Lia");
        assert_eq!(p.suggest_slot(&player(4, &[])), Some((Role::DF, 0)));
    }
}
