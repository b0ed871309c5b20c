//! Consistency router
//!
//! The single entry point the read path depends on. A request's consistency
//! level picks a [`Strategy`]; the router then runs the executors that
//! strategy names and returns one result set.
//!
//! Only `Default` and `TransactionalIfPossible` tolerate a silent change of
//! backend, and only when the transactional store reports that it cannot
//! express the query. Every other failure reaches the caller unchanged. The
//! router never retries.

use crate::merger::HybridMerger;
use crate::strategy::{resolve, Availability, Strategy};
use std::sync::Arc;
use tessera_core::{
    ChangeFeed, ConsistencyLevel, DbQueryExecutor, Error, IndexQueryExecutor, Result, ResultSet,
    SearchRequest,
};
use tracing::{debug, info};

/// Options for a router.
///
/// ```ignore
/// let opts = RouterOptions::new().hybrid_enabled(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterOptions {
    /// Gate for the `Hybrid` strategy
    pub hybrid_enabled: bool,
}

impl RouterOptions {
    /// Options with hybrid switched off
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch hybrid on or off
    pub fn hybrid_enabled(mut self, enabled: bool) -> Self {
        self.hybrid_enabled = enabled;
        self
    }
}

/// Routes requests to the backends their consistency level allows
///
/// Holds only read-only configuration and shared executors; every request is
/// an independent unit of work.
pub struct ConsistencyRouter {
    db: Option<Arc<dyn DbQueryExecutor>>,
    index: Option<Arc<dyn IndexQueryExecutor>>,
    feed: Option<Arc<dyn ChangeFeed>>,
    options: RouterOptions,
    merger: HybridMerger,
}

impl ConsistencyRouter {
    /// Create a builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Options in effect
    pub fn options(&self) -> RouterOptions {
        self.options
    }

    /// What is configured
    pub fn availability(&self) -> Availability {
        Availability {
            index: self.index.is_some(),
            db: self.db.is_some(),
            change_feed: self.feed.is_some(),
            hybrid_enabled: self.options.hybrid_enabled,
        }
    }

    /// Strategy a request at `level` would run with
    pub fn strategy_for(&self, level: ConsistencyLevel) -> Result<Strategy> {
        resolve(level, self.availability())
    }

    /// Execute `req` at its requested consistency
    pub fn execute(&self, req: &SearchRequest) -> Result<ResultSet> {
        if req.is_delta() {
            return Err(Error::InvalidRequest(
                "since_txid is reserved for hybrid delta queries".to_string(),
            ));
        }
        if req.context.stores.is_empty() {
            return Err(Error::InvalidRequest(
                "request names no store to search".to_string(),
            ));
        }
        req.context.cancel.check()?;

        let strategy = self.strategy_for(req.consistency)?;
        debug!(consistency = %req.consistency, strategy = %strategy, "resolved strategy");

        match strategy {
            Strategy::IndexOnly => self.index()?.query(req),
            Strategy::DbOnly => match self.db()?.query(req) {
                // A fallback level with nowhere to fall back to
                Err(Error::QueryModel { reason }) if req.consistency.allows_fallback() => {
                    Err(Error::query_unavailable(
                        req.consistency,
                        format!(
                            "transactional store cannot run the query and no index is configured: {}",
                            reason
                        ),
                    ))
                }
                other => other,
            },
            Strategy::Opportunistic => match self.db()?.query(req) {
                Err(e) if e.is_fallback_signal() => {
                    info!(
                        consistency = %req.consistency,
                        reason = %e,
                        "transactional store cannot run the query, falling back to the index"
                    );
                    self.index()?.query(req)
                }
                other => other,
            },
            Strategy::Hybrid => {
                let feed = self.feed.as_deref().ok_or_else(|| missing("change feed"))?;
                self.merger.merge(req, self.db()?, self.index()?, feed)
            }
        }
    }

    fn db(&self) -> Result<&dyn DbQueryExecutor> {
        self.db
            .as_deref()
            .ok_or_else(|| missing("transactional executor"))
    }

    fn index(&self) -> Result<&dyn IndexQueryExecutor> {
        self.index.as_deref().ok_or_else(|| missing("index executor"))
    }
}

fn missing(what: &str) -> Error {
    Error::Internal(format!("resolved strategy needs a {} that is not configured", what))
}

/// Builder for a [`ConsistencyRouter`].
///
/// ```ignore
/// let router = ConsistencyRouter::builder()
///     .db(Arc::new(db_executor))
///     .index(Arc::new(index_executor))
///     .change_feed(Arc::new(feed))
///     .options(RouterOptions::new().hybrid_enabled(true))
///     .build();
/// ```
#[derive(Default)]
pub struct RouterBuilder {
    db: Option<Arc<dyn DbQueryExecutor>>,
    index: Option<Arc<dyn IndexQueryExecutor>>,
    feed: Option<Arc<dyn ChangeFeed>>,
    options: RouterOptions,
}

impl RouterBuilder {
    /// Builder with no executors and hybrid off
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transactional executor
    pub fn db(mut self, executor: Arc<dyn DbQueryExecutor>) -> Self {
        self.db = Some(executor);
        self
    }

    /// Set the index executor
    pub fn index(mut self, executor: Arc<dyn IndexQueryExecutor>) -> Self {
        self.index = Some(executor);
        self
    }

    /// Set the change feed
    pub fn change_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Set options
    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for toggling hybrid
    pub fn hybrid_enabled(mut self, enabled: bool) -> Self {
        self.options.hybrid_enabled = enabled;
        self
    }

    /// Build the router
    pub fn build(self) -> ConsistencyRouter {
        ConsistencyRouter {
            db: self.db,
            index: self.index,
            feed: self.feed,
            options: self.options,
            merger: HybridMerger::new(),
        }
    }
}
