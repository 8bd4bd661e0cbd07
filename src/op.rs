//! Mutation operations accepted by the league store.

use crate::types::{MatchdayIndex, ParticipantId, PlayerId, Points, Role};

/// One state transition.
///
/// Participant and score operations act on the currently selected matchday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Append a player to the roster.
    AddPlayer {
        /// Display name; must not be blank.
        name: String,
        /// Role tags, primary first. Legacy tags are accepted.
        roles: Vec<String>,
    },
    /// Remove a player everywhere, clearing slots and captaincies.
    DeletePlayer {
        /// Player to remove.
        id: PlayerId,
    },
    /// Add a participant to the selected matchday.
    AddParticipant {
        /// Display name; must not be blank.
        name: String,
    },
    /// Remove a participant from the selected matchday only.
    DeleteParticipant {
        /// Participant to remove.
        id: ParticipantId,
    },
    /// Place a player in a slot, moving it out of any other slot.
    AssignSlot {
        /// Owning participant.
        participant: ParticipantId,
        /// Slot role.
        role: Role,
        /// Slot index within the role.
        index: usize,
        /// Player to place.
        player: PlayerId,
    },
    /// Empty a slot.
    ClearSlot {
        /// Owning participant.
        participant: ParticipantId,
        /// Slot role.
        role: Role,
        /// Slot index within the role.
        index: usize,
    },
    /// Switch formation, discarding the lineup and captain.
    ChangeFormation {
        /// Owning participant.
        participant: ParticipantId,
        /// Catalog formation, e.g. `"0-2-1-2"`.
        formation: String,
    },
    /// Set or clear the captain.
    SetCaptain {
        /// Owning participant.
        participant: ParticipantId,
        /// New captain.
        player: Option<PlayerId>,
    },
    /// Add `delta` to a player's points.
    AdjustPoints {
        /// Player to score.
        player: PlayerId,
        /// Signed increment.
        delta: Points,
    },
    /// Overwrite a player's points.
    SetPoints {
        /// Player to score.
        player: PlayerId,
        /// New value.
        value: Points,
    },
    /// Flip a player's not-played flag.
    ToggleNotPlayed {
        /// Player to flag.
        player: PlayerId,
    },
    /// Set a player's not-played flag.
    SetNotPlayed {
        /// Player to flag.
        player: PlayerId,
        /// New flag value.
        not_played: bool,
    },
    /// Zero every score and clear every not-played flag.
    ResetMatchdayPoints,
    /// Change the selected matchday.
    SelectMatchday {
        /// One-based matchday index.
        index: MatchdayIndex,
    },
}

impl Op {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Op::AddPlayer { .. } => "add_player",
            Op::DeletePlayer { .. } => "delete_player",
            Op::AddParticipant { .. } => "add_participant",
            Op::DeleteParticipant { .. } => "delete_participant",
            Op::AssignSlot { .. } => "assign_slot",
            Op::ClearSlot { .. } => "clear_slot",
            Op::ChangeFormation { .. } => "change_formation",
            Op::SetCaptain { .. } => "set_captain",
            Op::AdjustPoints { .. } => "adjust_points",
            Op::SetPoints { .. } => "set_points",
            Op::ToggleNotPlayed { .. } => "toggle_not_played",
            Op::SetNotPlayed { .. } => "set_not_played",
            Op::ResetMatchdayPoints => "reset_matchday_points",
            Op::SelectMatchday { .. } => "select_matchday",
        }
    }
}
