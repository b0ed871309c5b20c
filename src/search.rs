//! Main search entry point for Tessera.
//!
//! This module provides the `Tessera` struct, which owns a configured
//! [`ConsistencyRouter`] and answers search requests through it.

use crate::config::TesseraConfig;
use crate::error::Result;
use std::sync::Arc;
use tessera_core::{
    ChangeFeed, ConsistencyLevel, DbQueryExecutor, IndexQueryExecutor, ResultSet, SearchRequest,
};
use tessera_db::{MemoryStore, StoreChangeFeed, StoreQueryExecutor};
use tessera_index::HttpIndexExecutor;
use tessera_router::{ConsistencyRouter, Strategy};
use tracing::info;

/// The Tessera search service.
///
/// Create one with [`Tessera::builder`] or, for the bundled store,
/// [`Tessera::with_store`].
///
/// # Example
///
/// ```ignore
/// use tessera::prelude::*;
///
/// let config = TesseraConfig::from_path("tessera.toml")?;
/// let tessera = Tessera::builder()
///     .config(config)
///     .db(Arc::new(my_db_executor))
///     .change_feed(Arc::new(my_feed))
///     .build()?;
///
/// let results = tessera.search(
///     &SearchRequest::new("TEXT:budget").with_consistency(ConsistencyLevel::Hybrid),
/// )?;
/// ```
pub struct Tessera {
    router: ConsistencyRouter,
    config: TesseraConfig,
}

impl Tessera {
    /// Create a builder.
    pub fn builder() -> TesseraBuilder {
        TesseraBuilder::new()
    }

    /// Serve searches from `store` as the transactional backend and change
    /// feed, with the index (if any) taken from `config`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Arc::new(MemoryStore::new());
    /// let tessera = Tessera::with_store(TesseraConfig::default(), store.clone())?;
    /// ```
    pub fn with_store(config: TesseraConfig, store: Arc<MemoryStore>) -> Result<Self> {
        Self::builder()
            .config(config)
            .db(Arc::new(StoreQueryExecutor::new(Arc::clone(&store))))
            .change_feed(Arc::new(StoreChangeFeed::new(store)))
            .build()
    }

    /// Run a search at the request's consistency level.
    pub fn search(&self, req: &SearchRequest) -> Result<ResultSet> {
        self.router.execute(req).map_err(Into::into)
    }

    /// Strategy a request at `level` would run with.
    pub fn strategy_for(&self, level: ConsistencyLevel) -> Result<Strategy> {
        self.router.strategy_for(level).map_err(Into::into)
    }

    /// Configuration in effect.
    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    /// The underlying router.
    pub fn router(&self) -> &ConsistencyRouter {
        &self.router
    }
}

/// Builder for a [`Tessera`] service.
///
/// An index executor set with [`TesseraBuilder::index`] wins over the
/// `[index]` section of the configuration.
#[derive(Default)]
pub struct TesseraBuilder {
    config: TesseraConfig,
    db: Option<Arc<dyn DbQueryExecutor>>,
    index: Option<Arc<dyn IndexQueryExecutor>>,
    feed: Option<Arc<dyn ChangeFeed>>,
}

impl TesseraBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config`.
    pub fn config(mut self, config: TesseraConfig) -> Self {
        self.config = config;
        self
    }

    /// Switch hybrid on or off.
    pub fn hybrid_enabled(mut self, enabled: bool) -> Self {
        self.config.hybrid_enabled = enabled;
        self
    }

    /// Set the transactional executor.
    pub fn db(mut self, executor: Arc<dyn DbQueryExecutor>) -> Self {
        self.db = Some(executor);
        self
    }

    /// Set the index executor.
    pub fn index(mut self, executor: Arc<dyn IndexQueryExecutor>) -> Self {
        self.index = Some(executor);
        self
    }

    /// Set the change feed.
    pub fn change_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Validate the configuration and build the service.
    pub fn build(self) -> Result<Tessera> {
        self.config.validate()?;

        let index = match (self.index, &self.config.index) {
            (Some(executor), _) => Some(executor),
            (None, Some(index_config)) => {
                Some(Arc::new(HttpIndexExecutor::new(index_config.clone()))
                    as Arc<dyn IndexQueryExecutor>)
            }
            (None, None) => None,
        };

        let mut router = ConsistencyRouter::builder().options(self.config.router_options());
        if let Some(db) = self.db {
            router = router.db(db);
        }
        if let Some(index) = index {
            router = router.index(index);
        }
        if let Some(feed) = self.feed {
            router = router.change_feed(feed);
        }
        let router = router.build();

        let available = router.availability();
        info!(
            db = available.db,
            index = available.index,
            change_feed = available.change_feed,
            hybrid_enabled = available.hybrid_enabled,
            "search service ready"
        );

        Ok(Tessera {
            router,
            config: self.config,
        })
    }
}
