//! Public types for the Tessera API.
//!
//! This module re-exports types from the internal crates.

// Request vocabulary
pub use tessera_core::{
    CancellationToken, ConsistencyLevel, FtsOperator, LimitBy, QueryContext, ResultLimits,
    SearchRequest, SortDefinition, SortKind,
};

// Results
pub use tessera_core::{
    ChangedEntity, EntityRef, FacetCount, FieldValue, ResultEntry, ResultSet, TxnId,
};

// Backend seams
pub use tessera_core::{ChangeFeed, DbQueryExecutor, IndexQueryExecutor};

// Bundled backends
pub use tessera_db::{MemoryStore, Mutation, Node, StoreChangeFeed, StoreQueryExecutor};
pub use tessera_index::{HttpIndexExecutor, IndexConfig, StoreMapping};

// Routing
pub use tessera_router::{Availability, ConsistencyRouter, Strategy};
