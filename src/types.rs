//! Shared primitive IDs, league constants and the role enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Roster-wide player identifier.
pub type PlayerId = u64;
/// Participant identifier, drawn from a single league-wide counter.
pub type ParticipantId = u64;
/// One-based matchday index (`1..=MATCHDAY_COUNT`).
pub type MatchdayIndex = u32;
/// Signed per-matchday score.
pub type Points = i64;

/// Number of matchdays in a season.
pub const MATCHDAY_COUNT: usize = 26;
/// Number of slots in every formation.
pub const LINEUP_SIZE: u8 = 5;

/// Player role tag.
///
/// Ordering follows the pitch from goal outward and is used when sorting
/// rosters by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Goalkeeper.
    #[serde(alias = "PT")]
    GK,
    /// Defender.
    DF,
    /// Midfielder.
    #[serde(alias = "MC")]
    MD,
    /// Forward.
    #[serde(alias = "DL")]
    FW,
}

impl Role {
    /// All roles in lineup order.
    pub const ALL: [Role; 4] = [Role::GK, Role::DF, Role::MD, Role::FW];

    /// Role used when a player carries no role tag at all.
    pub const FALLBACK: Role = Role::DF;

    /// Canonical tag written to the persisted document.
    pub fn tag(self) -> &'static str {
        match self {
            Role::GK => "GK",
            Role::DF => "DF",
            Role::MD => "MD",
            Role::FW => "FW",
        }
    }

    /// Parses a canonical or legacy tag. Surrounding whitespace and case are ignored.
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "GK" | "PT" => Some(Role::GK),
            "DF" => Some(Role::DF),
            "MD" | "MC" => Some(Role::MD),
            "FW" | "DL" => Some(Role::FW),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_tag(s).ok_or_else(|| s.to_string())
    }
}
