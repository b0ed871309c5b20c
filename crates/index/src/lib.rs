//! Remote index executor for Tessera
//!
//! [`HttpIndexExecutor`] implements [`tessera_core::IndexQueryExecutor`] by
//! POSTing a JSON body to the index core mapped for the request's store and
//! reading back rows plus the snapshot watermark.
//!
//! - [`IndexConfig`]: store and language mappings, deadlines, limits
//! - [`ClientPool`]: one shared HTTP agent per endpoint
//! - [`Transport`]: seam between the executor and the network
//!
//! Failures talking to the index surface as `BackendUnavailable`. Nothing here
//! retries; following a single redirect is the only repeated call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod executor;
pub mod pool;
pub mod transport;

pub use config::{IndexConfig, StoreMapping, DEFAULT_LANGUAGE_FRAGMENT, MAX_ROWS};
pub use executor::HttpIndexExecutor;
pub use pool::ClientPool;
pub use transport::{HttpCall, HttpReply, Transport, TransportError, UreqTransport};
