//! Wire encoding for Tessera
//!
//! This crate implements the JSON contract of the remote index protocol.
//! Request serialization and response deserialization live here so the
//! executor never touches raw JSON.
//!
//! ## Request Body
//!
//! ```json
//! {
//!   "query": "TEXT:budget",
//!   "authorities": ["GROUP_EVERYONE"],
//!   "tenants": [""],
//!   "locales": ["en"],
//!   "templates": [{"name": "t", "template": "%cm:name"}],
//!   "sort": ["score desc"],
//!   "consistencyHint": "HYBRID"
//! }
//! ```
//!
//! ## Response Body
//!
//! ```json
//! {
//!   "rows": [{"entityRef": "n1", "score": 0.9}],
//!   "numFound": 1,
//!   "lastIndexedTxId": 5,
//!   "status": {"code": "OK", "message": ""}
//! }
//! ```
//!
//! A non-OK `status` block or a malformed body maps to
//! `Error::BackendUnavailable`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

// Re-export main types
pub use json::{
    decode_request, decode_response, encode_request, encode_response, IndexRequest,
    IndexResponse, IndexRow, QueryTemplate, ShardState, StatusCode, WireError, WireStatus,
};
