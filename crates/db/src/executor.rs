//! `DbQueryExecutor` over the in-memory store
//!
//! Results are always consistent with the last committed transaction. In delta
//! mode (`since_txid` set) only nodes touched after the watermark are
//! considered, read from the transaction log.

use crate::query::DbQuery;
use crate::store::{MemoryStore, Node};
use std::sync::Arc;
use tessera_core::{
    compare_entries, DbQueryExecutor, Error, Result, ResultEntry, ResultSet, SearchRequest,
};
use tracing::debug;

/// Executes the store's dialect against a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct StoreQueryExecutor {
    store: Arc<MemoryStore>,
}

impl StoreQueryExecutor {
    /// Create an executor over `store`
    pub fn new(store: Arc<MemoryStore>) -> Self {
        StoreQueryExecutor { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}

fn in_scope(node: &Node, req: &SearchRequest) -> bool {
    let ctx = &req.context;
    ctx.stores.iter().any(|s| *s == node.store)
        && node.tenant == ctx.tenant
        && node.is_readable_by(&ctx.authorities)
}

fn entry_for(node: &Node) -> ResultEntry {
    ResultEntry {
        entity: node.entity.clone(),
        score: 1.0,
        fields: node.properties.clone(),
    }
}

impl DbQueryExecutor for StoreQueryExecutor {
    fn query(&self, req: &SearchRequest) -> Result<ResultSet> {
        let ctx = &req.context;
        ctx.cancel.check()?;

        if ctx.stores.is_empty() {
            return Err(Error::InvalidRequest(
                "request names no store to search".to_string(),
            ));
        }
        if !ctx.facet_fields.is_empty() {
            return Err(Error::query_model(
                "faceting is not supported by the transactional store",
            ));
        }
        let query = DbQuery::parse(&req.query)?;

        let mut matched = vec![];
        self.store.visit(req.since_txid(), |node| {
            if in_scope(node, req) && query.matches(node) {
                matched.push(entry_for(node));
            }
        });
        ctx.cancel.check()?;

        // Visited in entity order; an explicit sort keeps that as the tiebreak
        if !ctx.sort.is_empty() {
            matched.sort_by(|a, b| compare_entries(a, b, &ctx.sort));
        }

        let total = matched.len() as u64;
        let skip = ctx.limits.skip_count as usize;
        let page: Vec<ResultEntry> = match ctx.limits.final_size() {
            Some(size) => matched.into_iter().skip(skip).take(size as usize).collect(),
            None => matched.into_iter().skip(skip).collect(),
        };
        let has_more = total > skip as u64 + page.len() as u64;

        debug!(
            query = %req.query,
            since = ?req.since_txid(),
            total,
            returned = page.len(),
            "transactional query"
        );
        Ok(ResultSet::new(page, total, has_more))
    }
}
