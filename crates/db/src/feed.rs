//! `ChangeFeed` over the store's transaction log

use crate::store::MemoryStore;
use std::sync::Arc;
use tessera_core::{ChangeFeed, ChangedEntity, Result, TxnId};

/// Reports entities touched after a watermark, deletions included
#[derive(Debug, Clone)]
pub struct StoreChangeFeed {
    store: Arc<MemoryStore>,
}

impl StoreChangeFeed {
    /// Create a feed over `store`
    pub fn new(store: Arc<MemoryStore>) -> Self {
        StoreChangeFeed { store }
    }
}

impl ChangeFeed for StoreChangeFeed {
    fn changed_since(&self, watermark: TxnId) -> Result<Vec<ChangedEntity>> {
        Ok(self.store.changes_since(watermark))
    }
}
