//! JSON envelopes of the remote index protocol
//!
//! - [`IndexRequest`]: body POSTed to the index handler
//! - [`IndexResponse`]: body the index answers with
//! - [`WireError`]: encoding, decoding and embedded-status failures

mod error;
mod request;
mod response;

pub use error::{StatusCode, WireError, WireStatus};
pub use request::{decode_request, encode_request, IndexRequest, QueryTemplate};
pub use response::{decode_response, encode_response, IndexResponse, IndexRow, ShardState};
