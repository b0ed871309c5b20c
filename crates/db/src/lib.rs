//! Reference transactional store for Tessera
//!
//! - [`MemoryStore`]: nodes, monotonically increasing transaction ids and a
//!   transaction log
//! - [`StoreQueryExecutor`]: [`tessera_core::DbQueryExecutor`] in a restricted
//!   dialect ([`DbQuery`]), with bounded delta scans
//! - [`StoreChangeFeed`]: [`tessera_core::ChangeFeed`] over the same log

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod executor;
pub mod feed;
pub mod query;
pub mod store;

pub use executor::StoreQueryExecutor;
pub use feed::StoreChangeFeed;
pub use query::{DbQuery, Pattern, Term};
pub use store::{MemoryStore, Mutation, Node, DEFAULT_NODE_TYPE};
