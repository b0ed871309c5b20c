//! Hybrid merge of index and transactional results
//!
//! ## Merge Sequence
//!
//! ```text
//! 1. index query                  -> entries, watermark T
//! 2. change feed since T          -> entities the index may show stale
//! 3. drop stale index entries
//! 4. transactional delta past T   -> fresh versions of recent writes
//! 5. filtered index entries, then delta entries not already present
//! 6. re-sort when the request names a sort order
//! ```
//!
//! Steps run sequentially; 2 and 4 both need T from step 1. The merge relies
//! on the index reporting non-decreasing watermarks and does not check it.

use std::collections::HashSet;
use tessera_core::{
    compare_entries, ChangeFeed, DbQueryExecutor, EntityRef, IndexQueryExecutor, Result,
    ResultSet, SearchRequest,
};
use tracing::{debug, warn};

/// Combines index results with a transactional delta
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridMerger;

impl HybridMerger {
    /// Create a merger
    pub fn new() -> Self {
        HybridMerger
    }

    /// Run a hybrid query
    ///
    /// Without a watermark from the index the index results are returned
    /// unmodified. Any backend failure fails the whole merge; no partial
    /// result is returned.
    pub fn merge(
        &self,
        req: &SearchRequest,
        db: &dyn DbQueryExecutor,
        index: &dyn IndexQueryExecutor,
        feed: &dyn ChangeFeed,
    ) -> Result<ResultSet> {
        let index_results = index.query(req)?;
        let Some(watermark) = index_results.last_indexed_txid() else {
            warn!(
                query = %req.query,
                "index reported no lastIndexedTxId; returning index results without a transactional delta"
            );
            return Ok(index_results);
        };

        req.context.cancel.check()?;
        let stale: HashSet<EntityRef> = feed
            .changed_since(watermark)?
            .into_iter()
            .map(|change| change.entity)
            .collect();

        let index_has_more = index_results.has_more();
        let mut merged: Vec<_> = index_results
            .into_iter()
            .filter(|entry| !stale.contains(&entry.entity))
            .collect();
        let filtered = merged.len();

        req.context.cancel.check()?;
        let mut delta_req = req.delta_from(watermark);
        // Paging applies to the index page, not to the patch
        delta_req.context.limits.skip_count = 0;
        let delta = db.query(&delta_req)?;
        let delta_has_more = delta.has_more();

        let mut present: HashSet<EntityRef> = merged.iter().map(|e| e.entity.clone()).collect();
        let mut appended = 0usize;
        for entry in delta {
            if present.insert(entry.entity.clone()) {
                merged.push(entry);
                appended += 1;
            }
        }

        if !req.context.sort.is_empty() {
            merged.sort_by(|a, b| compare_entries(a, b, &req.context.sort));
        }

        debug!(
            watermark = %watermark,
            changed = stale.len(),
            filtered,
            appended,
            "hybrid merge"
        );
        Ok(ResultSet::new(
            merged,
            (filtered + appended) as u64,
            index_has_more || delta_has_more,
        ))
    }
}
