//! Identifier types for the search read path
//!
//! This module defines the two identifiers every other module speaks in:
//! - [`TxnId`]: monotonically increasing id of a committed write
//! - [`EntityRef`]: opaque, stable reference to a searchable item

use serde::{Deserialize, Serialize};

/// Identifier of a committed transaction in the transactional store
///
/// Transaction ids are monotonically increasing. An index snapshot reports
/// the highest id it reflects as its watermark; everything strictly above
/// that watermark may be missing or stale in the index.
///
/// # Examples
///
/// ```
/// use tessera_core::TxnId;
///
/// let watermark = TxnId::new(5);
/// assert!(TxnId::new(6) > watermark);
/// assert_eq!(watermark.next(), TxnId::new(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(u64);

impl TxnId {
    /// The id preceding every committed transaction
    pub const ZERO: TxnId = TxnId(0);

    /// Create a transaction id from its raw value
    pub const fn new(id: u64) -> Self {
        TxnId(id)
    }

    /// Raw value
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id immediately after this one
    pub const fn next(self) -> Self {
        TxnId(self.0 + 1)
    }
}

impl From<u64> for TxnId {
    fn from(id: u64) -> Self {
        TxnId(id)
    }
}

impl std::fmt::Display for TxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, stable identifier for a searchable item (e.g. a content node)
///
/// Result sets are de-duplicated by `EntityRef` identity, and the hybrid merger
/// uses it to decide which index rows are superseded by fresher data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(String);

impl EntityRef {
    /// Create an entity reference
    pub fn new(id: impl Into<String>) -> Self {
        EntityRef(id.into())
    }

    /// Borrow the reference as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef(id.to_string())
    }
}

impl From<String> for EntityRef {
    fn from(id: String) -> Self {
        EntityRef(id)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
