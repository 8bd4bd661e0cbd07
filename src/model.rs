//! League domain records: players, lineups, participants and matchdays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    formation::{DEFAULT_FORMATION, Formation},
    types::{MATCHDAY_COUNT, MatchdayIndex, ParticipantId, PlayerId, Points, Role},
};

/// Roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Eligible roles; the first one is the primary role.
    pub roles: Vec<Role>,
}

impl Player {
    /// First role tag, or [`Role::FALLBACK`] for a player without roles.
    pub fn primary_role(&self) -> Role {
        self.roles.first().copied().unwrap_or(Role::FALLBACK)
    }
}

/// Slot assignments of one participant, one sequence per role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineup {
    /// Goalkeeper slots.
    #[serde(rename = "GK")]
    pub gk: Vec<Option<PlayerId>>,
    /// Defender slots.
    #[serde(rename = "DF")]
    pub df: Vec<Option<PlayerId>>,
    /// Midfielder slots.
    #[serde(rename = "MD")]
    pub md: Vec<Option<PlayerId>>,
    /// Forward slots.
    #[serde(rename = "FW")]
    pub fw: Vec<Option<PlayerId>>,
}

impl Lineup {
    /// Slots for `role`.
    pub fn slots(&self, role: Role) -> &[Option<PlayerId>] {
        match role {
            Role::GK => &self.gk,
            Role::DF => &self.df,
            Role::MD => &self.md,
            Role::FW => &self.fw,
        }
    }

    /// Mutable slots for `role`.
    pub fn slots_mut(&mut self, role: Role) -> &mut Vec<Option<PlayerId>> {
        match role {
            Role::GK => &mut self.gk,
            Role::DF => &mut self.df,
            Role::MD => &mut self.md,
            Role::FW => &mut self.fw,
        }
    }

    /// Every slot in `GK, DF, MD, FW` order.
    pub fn iter_slots(&self) -> impl Iterator<Item = &Option<PlayerId>> {
        Role::ALL.into_iter().flat_map(|role| self.slots(role).iter())
    }

    /// True when every role has exactly as many slots as `formation` asks for.
    pub fn matches(&self, formation: Formation) -> bool {
        Role::ALL
            .iter()
            .all(|role| self.slots(*role).len() == formation.count(*role))
    }
}

/// Fantasy team entry for one matchday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Identifier, unique within the owning matchday.
    pub id: ParticipantId,
    /// Display name; season aggregation joins on it.
    pub name: String,
    /// Current formation.
    pub formation: Formation,
    /// Slot assignments sized to `formation`.
    pub lineup: Lineup,
    /// Captain, whose points count twice while fielded.
    pub captain_id: Option<PlayerId>,
}

impl Participant {
    /// New participant with the default formation and an empty lineup.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            formation: DEFAULT_FORMATION,
            lineup: Lineup::empty(DEFAULT_FORMATION),
            captain_id: None,
        }
    }

    /// Name shown in classifications; unnamed entries get a numbered label.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Participant {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// One of the fixed matchday slots of a season.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchdayRecord {
    /// Participants entered for this matchday.
    pub participants: Vec<Participant>,
    /// Base points per player.
    pub points: BTreeMap<PlayerId, Points>,
    /// Players flagged as not having played.
    pub not_played: BTreeMap<PlayerId, bool>,
}

impl MatchdayRecord {
    /// Empty matchday with zero/false entries for every player in `players`.
    pub fn for_roster(players: &[Player]) -> Self {
        Self {
            participants: Vec::new(),
            points: players.iter().map(|p| (p.id, 0)).collect(),
            not_played: players.iter().map(|p| (p.id, false)).collect(),
        }
    }

    /// Base points for `id`, zero when absent.
    pub fn base_points(&self, id: PlayerId) -> Points {
        self.points.get(&id).copied().unwrap_or(0)
    }

    /// Not-played flag for `id`, false when absent.
    pub fn is_not_played(&self, id: PlayerId) -> bool {
        self.not_played.get(&id).copied().unwrap_or(false)
    }

    /// Participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

/// Complete persisted league document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueState {
    /// Roster in insertion order.
    pub players: Vec<Player>,
    /// Id handed to the next added player.
    pub next_player_id: PlayerId,
    /// Id handed to the next added participant.
    pub next_participant_id: ParticipantId,
    /// Currently selected matchday, one-based.
    pub current_matchday_index: MatchdayIndex,
    /// Exactly [`MATCHDAY_COUNT`] matchdays.
    pub matchdays: Vec<MatchdayRecord>,
}

const SEED_ROSTER: [(&str, &[Role]); 14] = [
    ("Ari Rojo", &[Role::FW]),
    ("Paula Diez", &[Role::MD, Role::DF]),
    ("Ana Garcia", &[Role::FW]),
    ("Ana Ferrer", &[Role::DF]),
    ("Nata Marin", &[Role::MD]),
    ("Celia Hoyos", &[Role::FW, Role::MD]),
    ("Paula Escobar", &[Role::DF]),
    ("Judith Arias", &[Role::DF]),
    ("Noemi Arias", &[Role::DF]),
    ("Maria Alonso", &[Role::GK]),
    ("Yaiza Gil", &[Role::FW]),
    ("Andrea Herrera", &[Role::DF, Role::MD, Role::FW]),
    ("Jasmine Sayas", &[Role::DF]),
    ("Alba Muro", &[Role::MD]),
];

/// Roster every fresh league starts with.
pub fn seed_roster() -> Vec<Player> {
    SEED_ROSTER
        .iter()
        .zip(1..)
        .map(|((name, roles), id)| Player {
            id,
            name: (*name).to_string(),
            roles: roles.to_vec(),
        })
        .collect()
}

impl LeagueState {
    /// Fresh league: seed roster, empty matchdays, matchday 1 selected.
    pub fn new() -> Self {
        let players = seed_roster();
        let next_player_id = players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let matchdays = (0..MATCHDAY_COUNT)
            .map(|_| MatchdayRecord::for_roster(&players))
            .collect();
        Self {
            players,
            next_player_id,
            next_participant_id: 1,
            current_matchday_index: 1,
            matchdays,
        }
    }

    /// Matchday by one-based index.
    pub fn matchday(&self, index: MatchdayIndex) -> Option<&MatchdayRecord> {
        let idx = usize::try_from(index).ok()?.checked_sub(1)?;
        self.matchdays.get(idx)
    }

    /// Currently selected matchday.
    pub fn current_matchday(&self) -> Option<&MatchdayRecord> {
        self.matchday(self.current_matchday_index)
    }

    pub(crate) fn current_matchday_mut(&mut self) -> Option<&mut MatchdayRecord> {
        let idx = usize::try_from(self.current_matchday_index)
            .ok()?
            .checked_sub(1)?;
        self.matchdays.get_mut(idx)
    }

    /// Player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

impl Default for LeagueState {
    fn default() -> Self {
        Self::new()
    }
}
