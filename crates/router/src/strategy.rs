//! Strategy selection
//!
//! | Level | Strategy |
//! |-------|----------|
//! | `Eventual` | `IndexOnly` |
//! | `Transactional` | `DbOnly` |
//! | `Hybrid` | `Hybrid` (flag on, index + store + feed present) |
//! | `Default`, `TransactionalIfPossible` | `Opportunistic`, or whichever single backend exists |
//!
//! Selection is a pure function of the level and what is configured, so it
//! can be inspected without running a query.

use tessera_core::{ConsistencyLevel, Error, Result};

/// Feature name reported when hybrid cannot run
pub const HYBRID_FEATURE: &str = "hybrid consistency";

/// How a request is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Query the index only
    IndexOnly,
    /// Query the transactional store only
    DbOnly,
    /// Index results patched with a transactional delta
    Hybrid,
    /// Transactional store first, index if the store cannot express the query
    Opportunistic,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::IndexOnly => "index-only",
            Strategy::DbOnly => "db-only",
            Strategy::Hybrid => "hybrid",
            Strategy::Opportunistic => "opportunistic",
        };
        f.write_str(name)
    }
}

/// What the router has to work with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    /// An index executor is configured
    pub index: bool,
    /// A transactional executor is configured
    pub db: bool,
    /// A change feed is configured
    pub change_feed: bool,
    /// The hybrid feature flag is on
    pub hybrid_enabled: bool,
}

/// Resolve the strategy for `level`
pub fn resolve(level: ConsistencyLevel, available: Availability) -> Result<Strategy> {
    match level {
        ConsistencyLevel::Eventual if available.index => Ok(Strategy::IndexOnly),
        ConsistencyLevel::Eventual => Err(Error::query_unavailable(
            level,
            "no index executor is configured",
        )),

        ConsistencyLevel::Transactional if available.db => Ok(Strategy::DbOnly),
        ConsistencyLevel::Transactional => Err(Error::query_unavailable(
            level,
            "no transactional executor is configured",
        )),

        ConsistencyLevel::Hybrid => {
            if !available.hybrid_enabled {
                return Err(Error::DisabledFeature {
                    feature: HYBRID_FEATURE.to_string(),
                });
            }
            let missing = [
                (available.index, "index executor"),
                (available.db, "transactional executor"),
                (available.change_feed, "change feed"),
            ]
            .into_iter()
            .filter(|(present, _)| !present)
            .map(|(_, name)| name)
            .collect::<Vec<_>>();
            if missing.is_empty() {
                Ok(Strategy::Hybrid)
            } else {
                Err(Error::DisabledFeature {
                    feature: format!("{} (missing {})", HYBRID_FEATURE, missing.join(", ")),
                })
            }
        }

        ConsistencyLevel::Default | ConsistencyLevel::TransactionalIfPossible => {
            match (available.db, available.index) {
                (true, true) => Ok(Strategy::Opportunistic),
                (true, false) => Ok(Strategy::DbOnly),
                (false, true) => Ok(Strategy::IndexOnly),
                (false, false) => Err(Error::query_unavailable(
                    level,
                    "neither a transactional nor an index executor is configured",
                )),
            }
        }
    }
}
