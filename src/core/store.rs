use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    core::migrate,
    engine::scoring::{self, MatchdayStanding, SeasonStanding, TeamOfTheWeek},
    formation::Formation,
    model::{LeagueState, MatchdayRecord, Participant, Player},
    op::Op,
    persist::{PersistResult, STORAGE_KEY, StateSink},
    types::{MATCHDAY_COUNT, MatchdayIndex, ParticipantId, PlayerId, Role},
};

/// Rejection returned by the mutation API. The previous snapshot stays current.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Player or participant name is blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Role tag outside the canonical and legacy vocabularies.
    #[error("unrecognized role tag {0:?}")]
    UnknownRole(String),
    /// Player added with an empty role list.
    #[error("a player needs at least one role")]
    NoRoles,
    /// Player id not on the roster.
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),
    /// Participant id not present in the selected matchday.
    #[error("no participant with id {0} in the selected matchday")]
    UnknownParticipant(ParticipantId),
    /// Slot address outside the participant's formation.
    #[error("no {role} slot at index {index}")]
    SlotOutOfRange {
        /// Addressed role.
        role: Role,
        /// Addressed index within the role.
        index: usize,
    },
    /// Matchday index outside `1..=MATCHDAY_COUNT`.
    #[error("matchday {0} is outside the season")]
    MatchdayOutOfRange(MatchdayIndex),
    /// Formation string not in the catalog.
    #[error("{0:?} is not a catalog formation")]
    UnknownFormation(String),
    /// The id counter cannot advance past its current value.
    #[error("no {0} ids left to hand out")]
    IdSpaceExhausted(&'static str),
}

/// Sink binding for [`LeagueStore::open`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Document key in the sink.
    pub storage_key: String,
    /// Write the migrated document back right after loading.
    pub persist_on_load: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            persist_on_load: true,
        }
    }
}

/// Single writer over immutable league snapshots.
///
/// Every accepted op builds a new [`LeagueState`] from a copy of the current
/// one, swaps it in and writes it through to the sink. Snapshots handed out
/// earlier are never touched.
pub struct LeagueStore {
    state: Arc<LeagueState>,
    sink: Option<Box<dyn StateSink>>,
    config: StoreConfig,
}

impl LeagueStore {
    /// In-memory store over the default league.
    pub fn new() -> Self {
        Self::with_state(LeagueState::new(), None, StoreConfig::default())
    }

    /// Store over `state`, normalized first so the store only ever holds
    /// valid snapshots.
    pub fn from_state(state: LeagueState) -> Self {
        let value = serde_json::to_value(&state).ok();
        Self::with_state(migrate::migrate(value.as_ref()), None, StoreConfig::default())
    }

    /// Loads and migrates the document under `config.storage_key`.
    ///
    /// A failed read is treated like a missing document.
    pub fn open(sink: Box<dyn StateSink>, config: StoreConfig) -> Self {
        let raw = match sink.load(&config.storage_key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to read league document {:?}: {err}", config.storage_key);
                None
            }
        };
        let state = migrate::migrate_str(raw.as_deref());
        info!(
            "league loaded: {} players, matchday {} selected",
            state.players.len(),
            state.current_matchday_index
        );

        let persist_on_load = config.persist_on_load;
        let mut store = Self::with_state(state, Some(sink), config);
        if persist_on_load {
            store.persist();
        }
        store
    }

    fn with_state(state: LeagueState, sink: Option<Box<dyn StateSink>>, config: StoreConfig) -> Self {
        Self {
            state: Arc::new(state),
            sink,
            config,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<LeagueState> {
        Arc::clone(&self.state)
    }

    /// Applies `op` and returns the committed snapshot.
    pub fn apply(&mut self, op: Op) -> Result<Arc<LeagueState>, MutationError> {
        let mut next = LeagueState::clone(&self.state);
        transition(&mut next, &op)?;
        debug!(
            "committed {} on matchday {}",
            op.kind(),
            next.current_matchday_index
        );
        self.state = Arc::new(next);
        self.persist();
        Ok(self.state())
    }

    /// Adds a player and returns the id it was given.
    pub fn add_player(&mut self, name: &str, roles: &[&str]) -> Result<PlayerId, MutationError> {
        let id = self.state.next_player_id;
        self.apply(Op::AddPlayer {
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        })?;
        Ok(id)
    }

    /// Removes a player from the roster and from every matchday.
    pub fn delete_player(&mut self, id: PlayerId) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::DeletePlayer { id })
    }

    /// Adds a participant to the selected matchday and returns its id.
    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, MutationError> {
        let id = self.state.next_participant_id;
        self.apply(Op::AddParticipant {
            name: name.to_string(),
        })?;
        Ok(id)
    }

    /// Removes a participant from the selected matchday.
    pub fn delete_participant(&mut self, id: ParticipantId) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::DeleteParticipant { id })
    }

    /// Places `player` at `(role, index)` in `participant`'s lineup.
    pub fn assign_slot(
        &mut self,
        participant: ParticipantId,
        role: Role,
        index: usize,
        player: PlayerId,
    ) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::AssignSlot {
            participant,
            role,
            index,
            player,
        })
    }

    /// Empties `(role, index)` in `participant`'s lineup.
    pub fn clear_slot(
        &mut self,
        participant: ParticipantId,
        role: Role,
        index: usize,
    ) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::ClearSlot {
            participant,
            role,
            index,
        })
    }

    /// Switches `participant` to a catalog formation, resetting its lineup.
    pub fn change_formation(
        &mut self,
        participant: ParticipantId,
        formation: &str,
    ) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::ChangeFormation {
            participant,
            formation: formation.to_string(),
        })
    }

    /// Sets or clears `participant`'s captain.
    pub fn set_captain(
        &mut self,
        participant: ParticipantId,
        player: Option<PlayerId>,
    ) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::SetCaptain { participant, player })
    }

    /// Adds `delta` to `player`'s points in the selected matchday.
    pub fn adjust_points(&mut self, player: PlayerId, delta: i64) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::AdjustPoints { player, delta })
    }

    /// Overwrites `player`'s points in the selected matchday.
    pub fn set_points(&mut self, player: PlayerId, value: i64) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::SetPoints { player, value })
    }

    /// Flips `player`'s not-played flag in the selected matchday.
    pub fn toggle_not_played(&mut self, player: PlayerId) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::ToggleNotPlayed { player })
    }

    /// Sets `player`'s not-played flag in the selected matchday.
    pub fn set_not_played(&mut self, player: PlayerId, not_played: bool) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::SetNotPlayed { player, not_played })
    }

    /// Zeroes scores and clears not-played flags in the selected matchday.
    pub fn reset_matchday_points(&mut self) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::ResetMatchdayPoints)
    }

    /// Selects the matchday that participant and score ops act on.
    pub fn select_matchday(&mut self, index: MatchdayIndex) -> Result<Arc<LeagueState>, MutationError> {
        self.apply(Op::SelectMatchday { index })
    }

    /// Quick-pick slot for `player` in `participant`'s lineup on the selected
    /// matchday. `None` when either is unknown or the role has no slot.
    pub fn suggest_slot(&self, participant: ParticipantId, player: PlayerId) -> Option<(Role, usize)> {
        let player = self.state.player(player)?;
        self.state
            .current_matchday()?
            .participant(participant)?
            .suggest_slot(player)
    }

    /// Team of the week of the selected matchday.
    pub fn team_of_the_week(&self) -> TeamOfTheWeek {
        self.with_current(|md| scoring::team_of_the_week(md, &self.state.players))
    }

    /// Classification of the selected matchday.
    pub fn matchday_classification(&self) -> Vec<MatchdayStanding> {
        self.with_current(scoring::matchday_classification)
    }

    /// Season classification over all matchdays.
    pub fn season_classification(&self) -> Vec<SeasonStanding> {
        scoring::season_classification(&self.state.matchdays)
    }

    /// Serialized form of the current snapshot.
    pub fn export_document(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(&*self.state)?)
    }

    fn with_current<T>(&self, f: impl FnOnce(&MatchdayRecord) -> T) -> T {
        match self.state.current_matchday() {
            Some(md) => f(md),
            None => f(&MatchdayRecord::default()),
        }
    }

    fn persist(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let written = serde_json::to_string(&*self.state)
            .map_err(Into::into)
            .and_then(|payload| sink.store(&self.config.storage_key, &payload));
        if let Err(err) = written {
            warn!("league snapshot not persisted: {err}");
        }
    }
}

impl Default for LeagueStore {
    fn default() -> Self {
        Self::new()
    }
}

fn transition(state: &mut LeagueState, op: &Op) -> Result<(), MutationError> {
    match op {
        Op::AddPlayer { name, roles } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(MutationError::EmptyName);
            }
            let mut parsed: Vec<Role> = Vec::with_capacity(roles.len());
            for tag in roles {
                let role = Role::from_tag(tag).ok_or_else(|| MutationError::UnknownRole(tag.clone()))?;
                if !parsed.contains(&role) {
                    parsed.push(role);
                }
            }
            if parsed.is_empty() {
                return Err(MutationError::NoRoles);
            }

            let id = state.next_player_id;
            state.next_player_id = id
                .checked_add(1)
                .ok_or(MutationError::IdSpaceExhausted("player"))?;
            state.players.push(Player {
                id,
                name: name.to_string(),
                roles: parsed,
            });
            for md in &mut state.matchdays {
                md.points.insert(id, 0);
                md.not_played.insert(id, false);
            }
        }
        Op::DeletePlayer { id } => {
            let pos = state
                .players
                .iter()
                .position(|p| p.id == *id)
                .ok_or(MutationError::UnknownPlayer(*id))?;
            state.players.remove(pos);
            for md in &mut state.matchdays {
                md.points.remove(id);
                md.not_played.remove(id);
                for participant in &mut md.participants {
                    participant.lineup.remove_player(*id);
                    if participant.captain_id == Some(*id) {
                        participant.captain_id = None;
                    }
                }
            }
        }
        Op::AddParticipant { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(MutationError::EmptyName);
            }
            let id = state.next_participant_id;
            let next = id
                .checked_add(1)
                .ok_or(MutationError::IdSpaceExhausted("participant"))?;
            current_mut(state)?
                .participants
                .push(Participant::new(id, name));
            state.next_participant_id = next;
        }
        Op::DeleteParticipant { id } => {
            let md = current_mut(state)?;
            let pos = md
                .participants
                .iter()
                .position(|p| p.id == *id)
                .ok_or(MutationError::UnknownParticipant(*id))?;
            md.participants.remove(pos);
        }
        Op::AssignSlot {
            participant,
            role,
            index,
            player,
        } => {
            if state.player(*player).is_none() {
                return Err(MutationError::UnknownPlayer(*player));
            }
            let pt = slot_owner(state, *participant, *role, *index)?;
            pt.assign_player(*role, *index, *player);
        }
        Op::ClearSlot {
            participant,
            role,
            index,
        } => {
            slot_owner(state, *participant, *role, *index)?.clear_slot(*role, *index);
        }
        Op::ChangeFormation {
            participant,
            formation,
        } => {
            let formation = Formation::parse(formation)
                .ok_or_else(|| MutationError::UnknownFormation(formation.clone()))?;
            participant_mut(state, *participant)?.change_formation(formation);
        }
        Op::SetCaptain {
            participant,
            player,
        } => {
            participant_mut(state, *participant)?.set_captain(*player);
        }
        Op::AdjustPoints { player, delta } => {
            let pts = points_mut(state, *player)?;
            *pts = pts.saturating_add(*delta);
        }
        Op::SetPoints { player, value } => {
            *points_mut(state, *player)? = *value;
        }
        Op::ToggleNotPlayed { player } => {
            let flag = not_played_mut(state, *player)?;
            *flag = !*flag;
        }
        Op::SetNotPlayed { player, not_played } => {
            *not_played_mut(state, *player)? = *not_played;
        }
        Op::ResetMatchdayPoints => {
            let reset = MatchdayRecord::for_roster(&state.players);
            let md = current_mut(state)?;
            md.points = reset.points;
            md.not_played = reset.not_played;
        }
        Op::SelectMatchday { index } => {
            if !(1..=MATCHDAY_COUNT as MatchdayIndex).contains(index) {
                return Err(MutationError::MatchdayOutOfRange(*index));
            }
            state.current_matchday_index = *index;
        }
    }
    Ok(())
}

fn current_mut(state: &mut LeagueState) -> Result<&mut MatchdayRecord, MutationError> {
    let index = state.current_matchday_index;
    state
        .current_matchday_mut()
        .ok_or(MutationError::MatchdayOutOfRange(index))
}

fn participant_mut(state: &mut LeagueState, id: ParticipantId) -> Result<&mut Participant, MutationError> {
    current_mut(state)?
        .participants
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(MutationError::UnknownParticipant(id))
}

fn slot_owner(
    state: &mut LeagueState,
    id: ParticipantId,
    role: Role,
    index: usize,
) -> Result<&mut Participant, MutationError> {
    let pt = participant_mut(state, id)?;
    if !pt.lineup.has_slot(role, index) {
        return Err(MutationError::SlotOutOfRange { role, index });
    }
    Ok(pt)
}

fn points_mut(state: &mut LeagueState, player: PlayerId) -> Result<&mut i64, MutationError> {
    if state.player(player).is_none() {
        return Err(MutationError::UnknownPlayer(player));
    }
    Ok(current_mut(state)?.points.entry(player).or_insert(0))
}

fn not_played_mut(state: &mut LeagueState, player: PlayerId) -> Result<&mut bool, MutationError> {
    if state.player(player).is_none() {
        return Err(MutationError::UnknownPlayer(player));
    }
    Ok(current_mut(state)?.not_played.entry(player).or_insert(false))
}
