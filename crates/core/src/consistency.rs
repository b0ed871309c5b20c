//! Requested consistency levels
//!
//! ## Wire Values (Canonical)
//!
//! These strings are frozen and must round-trip exactly through every
//! serialization boundary:
//!
//! | Level | Wire value |
//! |-------|------------|
//! | Default | `DEFAULT` |
//! | Eventual | `EVENTUAL` |
//! | Transactional | `TRANSACTIONAL` |
//! | TransactionalIfPossible | `TRANSACTIONAL_IF_POSSIBLE` |
//! | Hybrid | `HYBRID` |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller-specified guarantee about how fresh and complete results must be
///
/// A request always carries a concrete level; there is no "unset" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    /// Transactional when the store can express the query, otherwise eventual
    #[default]
    Default,

    /// Index only; results may lag committed writes
    Eventual,

    /// Transactional store only; no fallback
    Transactional,

    /// Same routing as `Default`, stated explicitly by the caller
    TransactionalIfPossible,

    /// Index results patched with a transactional delta past the index watermark
    Hybrid,
}

impl ConsistencyLevel {
    /// All levels (for iteration)
    pub const ALL: [ConsistencyLevel; 5] = [
        ConsistencyLevel::Default,
        ConsistencyLevel::Eventual,
        ConsistencyLevel::Transactional,
        ConsistencyLevel::TransactionalIfPossible,
        ConsistencyLevel::Hybrid,
    ];

    /// Canonical wire value
    pub const fn as_wire_str(self) -> &'static str {
        match self {
            ConsistencyLevel::Default => "DEFAULT",
            ConsistencyLevel::Eventual => "EVENTUAL",
            ConsistencyLevel::Transactional => "TRANSACTIONAL",
            ConsistencyLevel::TransactionalIfPossible => "TRANSACTIONAL_IF_POSSIBLE",
            ConsistencyLevel::Hybrid => "HYBRID",
        }
    }

    /// Whether this level tolerates silent substitution of the index for the store
    pub const fn allows_fallback(self) -> bool {
        matches!(
            self,
            ConsistencyLevel::Default | ConsistencyLevel::TransactionalIfPossible
        )
    }
}

impl std::fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Error returned when parsing an unknown wire value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown consistency level: {0}")]
pub struct UnknownConsistencyLevel(pub String);

impl FromStr for ConsistencyLevel {
    type Err = UnknownConsistencyLevel;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ConsistencyLevel::ALL
            .into_iter()
            .find(|level| level.as_wire_str() == s)
            .ok_or_else(|| UnknownConsistencyLevel(s.to_string()))
    }
}
