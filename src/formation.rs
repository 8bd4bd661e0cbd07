//! Five-slot formation shapes and the fixed catalog of legal ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Per-role slot counts of a lineup, written `GK-DF-MD-FW` (e.g. `1-1-1-2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Formation {
    gk: u8,
    df: u8,
    md: u8,
    fw: u8,
}

/// Every legal formation, in picker order.
pub const FORMATIONS: [Formation; 9] = [
    Formation::new(0, 1, 1, 3),
    Formation::new(0, 1, 2, 2),
    Formation::new(0, 1, 3, 1),
    Formation::new(0, 2, 1, 2),
    Formation::new(0, 2, 2, 1),
    Formation::new(0, 3, 1, 1),
    Formation::new(1, 1, 1, 2),
    Formation::new(1, 1, 2, 1),
    Formation::new(1, 2, 1, 1),
];

/// Formation given to new participants and used when a stored one is unusable.
pub const DEFAULT_FORMATION: Formation = Formation::new(1, 1, 1, 2);

/// Goalkeeper digit prefixed to legacy three-segment formations.
const LEGACY_GK_DIGIT: &str = "1";

impl Formation {
    const fn new(gk: u8, df: u8, md: u8, fw: u8) -> Self {
        Self { gk, df, md, fw }
    }

    /// Slot count for `role`.
    pub fn count(&self, role: Role) -> usize {
        usize::from(match role {
            Role::GK => self.gk,
            Role::DF => self.df,
            Role::MD => self.md,
            Role::FW => self.fw,
        })
    }

    /// Counts in `GK, DF, MD, FW` order.
    pub fn counts(&self) -> [usize; 4] {
        Role::ALL.map(|role| self.count(role))
    }

    /// Sum of all slot counts.
    pub fn total(&self) -> usize {
        self.counts().iter().sum()
    }

    /// Parses a catalog formation. Legacy three-segment strings are accepted
    /// with the goalkeeper digit assumed.
    pub fn parse(text: &str) -> Option<Formation> {
        let text = text.trim();
        let segments: Vec<&str> = text.split('-').collect();
        let owned;
        let full = if segments.len() == 3 {
            owned = format!("{LEGACY_GK_DIGIT}-{text}");
            owned.as_str()
        } else {
            text
        };

        let digits: Vec<u8> = full
            .split('-')
            .map(|s| s.trim().parse::<u8>().ok())
            .collect::<Option<Vec<_>>>()?;
        let [gk, df, md, fw] = digits.as_slice() else {
            return None;
        };

        let candidate = Formation::new(*gk, *df, *md, *fw);
        FORMATIONS.contains(&candidate).then_some(candidate)
    }

    /// Like [`Formation::parse`] but collapses anything unusable to
    /// [`DEFAULT_FORMATION`].
    pub fn normalize(text: &str) -> Formation {
        Self::parse(text).unwrap_or(DEFAULT_FORMATION)
    }
}

impl Default for Formation {
    fn default() -> Self {
        DEFAULT_FORMATION
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.gk, self.df, self.md, self.fw)
    }
}

impl From<Formation> for String {
    fn from(value: Formation) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Formation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Formation::parse(&value).ok_or(value)
    }
}
