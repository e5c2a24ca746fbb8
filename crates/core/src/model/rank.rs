use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankError {
    #[error("unknown rank tier: {0}")]
    UnknownTier(String),

    #[error("unknown rank filter: {0}")]
    UnknownFilter(String),
}

//
// ─── RANK TIER ─────────────────────────────────────────────────────────────────
//

/// Ordinal classification of a user.
///
/// Drives both catalog visibility and difficulty gating. The derived `Ord`
/// gives `Bronze < Silver < Gold`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankTier {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl RankTier {
    pub const ALL: [RankTier; 3] = [RankTier::Bronze, RankTier::Silver, RankTier::Gold];

    /// Wire name used in catalog paths and payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RankTier::Bronze => "BRONZE",
            RankTier::Silver => "SILVER",
            RankTier::Gold => "GOLD",
        }
    }

    /// Highest quiz level reachable at this tier.
    #[must_use]
    pub fn max_level(self) -> i32 {
        match self {
            RankTier::Bronze => 1,
            RankTier::Silver => 2,
            RankTier::Gold => 3,
        }
    }

    /// Parses a rank as reported by the service, falling back to `Bronze`
    /// for anything unrecognised (including an empty string).
    #[must_use]
    pub fn from_wire_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankTier {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRONZE" => Ok(RankTier::Bronze),
            "SILVER" => Ok(RankTier::Silver),
            "GOLD" => Ok(RankTier::Gold),
            _ => Err(RankError::UnknownTier(s.to_string())),
        }
    }
}

/// Whether a user at `rank` may attempt a quiz of the given `level`.
///
/// Gold reaches levels up to 3, Silver up to 2, Bronze up to 1.
#[must_use]
pub fn can_access_level(rank: RankTier, level: i32) -> bool {
    level <= rank.max_level()
}

//
// ─── CATALOG FILTER ────────────────────────────────────────────────────────────
//

/// Which catalog items a user may see, relative to their own rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankFilter {
    /// Only items authored for exactly the user's rank.
    #[default]
    Exact,
    /// Items authored for the user's rank or any lower one.
    AtOrBelow,
}

impl RankFilter {
    #[must_use]
    pub fn admits(self, user_rank: RankTier, item_rank: RankTier) -> bool {
        match self {
            RankFilter::Exact => item_rank == user_rank,
            RankFilter::AtOrBelow => item_rank <= user_rank,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RankFilter::Exact => "exact",
            RankFilter::AtOrBelow => "at-or-below",
        }
    }
}

impl FromStr for RankFilter {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(RankFilter::Exact),
            "at-or-below" | "at_or_below" | "inclusive" => Ok(RankFilter::AtOrBelow),
            _ => Err(RankError::UnknownFilter(s.to_string())),
        }
    }
}
