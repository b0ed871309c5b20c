//! # Tessera
//!
//! Consistency-aware query routing for content repository search.
//!
//! A search request names a consistency level. Tessera sends it to the
//! transactional store, the remote full-text index, or both, and for the
//! `Hybrid` level patches the index results with everything committed
//! after the index's watermark.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tessera::prelude::*;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.put(Node::new("n1").with_text("quarterly budget"))?;
//!
//! let tessera = Tessera::with_store(TesseraConfig::from_path("tessera.toml")?, store)?;
//! let results = tessera.search(
//!     &SearchRequest::new("TEXT:budget").with_consistency(ConsistencyLevel::Hybrid),
//! )?;
//! ```
//!
//! ## Consistency Levels
//!
//! | Level                       | Strategy                                  |
//! |-----------------------------|-------------------------------------------|
//! | `Transactional`             | transactional store only                  |
//! | `Eventual`                  | index only                                |
//! | `Default`, `TransactionalIfPossible` | store, falling back to the index |
//! | `Hybrid`                    | index patched with the store's delta      |
//!
//! ## Crates
//!
//! - `tessera-core`: request, result and error vocabulary
//! - `tessera-wire`: JSON contract of the index protocol
//! - `tessera-index`: HTTP index executor
//! - `tessera-db`: in-memory transactional store and change feed
//! - `tessera-router`: strategy resolution and the hybrid merge

#![warn(missing_docs)]

mod config;
mod error;
mod search;
mod types;

pub mod prelude;

// Re-export main entry points
pub use config::TesseraConfig;
pub use error::{Error, Result};
pub use search::{Tessera, TesseraBuilder};

// Re-export types
pub use types::*;
