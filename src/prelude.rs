//! Convenient imports for Tessera.
//!
//! ```ignore
//! use tessera::prelude::*;
//!
//! let tessera = Tessera::with_store(TesseraConfig::default(), Arc::new(MemoryStore::new()))?;
//! let results = tessera.search(&SearchRequest::new("TEXT:budget"))?;
//! ```

// Main entry point
pub use crate::search::{Tessera, TesseraBuilder};
pub use crate::config::TesseraConfig;

// Error handling
pub use crate::error::{Error, Result};

// Requests and results
pub use crate::types::{ConsistencyLevel, ResultSet, SearchRequest, SortDefinition};

// Bundled store
pub use crate::types::{MemoryStore, Node};

// Shared handles for executors
pub use std::sync::Arc;
