//! Backend seams consumed by the router
//!
//! Executors are shared across concurrent requests (`Send + Sync`) and hold no
//! per-request state; everything request-specific arrives in the
//! [`SearchRequest`].

use crate::error::Result;
use crate::request::SearchRequest;
use crate::result::{ChangedEntity, ResultSet};
use crate::types::TxnId;

/// Runs queries against the transactional store
///
/// Observes the caller's own committed writes. Constructs outside the store's
/// dialect must fail fast with [`Error::QueryModel`](crate::Error::QueryModel),
/// never with a partial result. When `req.since_txid()` is set, only entities
/// touched by transactions strictly after it are returned, at a cost
/// proportional to recent write volume.
pub trait DbQueryExecutor: Send + Sync {
    /// Execute `req` against the store
    fn query(&self, req: &SearchRequest) -> Result<ResultSet>;
}

/// Runs queries against the remote, eventually-consistent index
///
/// Results carry the snapshot watermark in
/// [`ResultSet::last_indexed_txid`]. Network, timeout and protocol failures
/// surface as [`Error::BackendUnavailable`](crate::Error::BackendUnavailable);
/// no retry happens here.
///
/// Successive snapshots are assumed to report non-decreasing watermarks.
/// Consumers rely on this without re-checking it.
pub trait IndexQueryExecutor: Send + Sync {
    /// Execute `req` against the index
    fn query(&self, req: &SearchRequest) -> Result<ResultSet>;
}

/// Reports entities touched after a watermark
pub trait ChangeFeed: Send + Sync {
    /// Every entity mutated by a transaction with id strictly greater than
    /// `watermark`, each once, with its latest transaction id
    fn changed_since(&self, watermark: TxnId) -> Result<Vec<ChangedEntity>>;
}
