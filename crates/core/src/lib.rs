//! Core types for Tessera
//!
//! This crate defines the vocabulary shared by every part of the search read path:
//! - [`ConsistencyLevel`]: caller-requested freshness guarantee
//! - [`SearchRequest`] / [`QueryContext`]: what to run and on whose behalf
//! - [`ResultSet`] / [`ResultEntry`] / [`ChangedEntity`]: what executors produce
//! - [`DbQueryExecutor`], [`IndexQueryExecutor`], [`ChangeFeed`]: backend seams
//! - [`Error`]: the routing error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod consistency;
pub mod error;
pub mod request;
pub mod result;
pub mod sort;
pub mod traits;
pub mod types;

pub use cancel::CancellationToken;
pub use consistency::ConsistencyLevel;
pub use error::{Error, Result};
pub use request::{FtsOperator, LimitBy, QueryContext, ResultLimits, SearchRequest};
pub use result::{ChangedEntity, FacetCount, FieldValue, ResultEntry, ResultSet};
pub use sort::{compare_entries, SortDefinition, SortKind};
pub use traits::{ChangeFeed, DbQueryExecutor, IndexQueryExecutor};
pub use types::{EntityRef, TxnId};
