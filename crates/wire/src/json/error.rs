//! Wire errors and the embedded status block
//!
//! The index may answer HTTP 200 and still report a failure in-band:
//! ```json
//! {
//!   "status": {"code": "INTERNAL", "message": "searcher not ready"}
//! }
//! ```
//! Such a block, like a body that does not parse, means the backend is not
//! usable for this request.

use serde::{Deserialize, Serialize};
use tessera_core::Error;
use thiserror::Error as ThisError;

/// Status code as the index reports it: a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    /// Numeric code (`0` and `200` are OK)
    Number(i64),
    /// Symbolic code (`OK`, any case, is OK)
    Text(String),
}

impl StatusCode {
    /// Whether this code reports success
    pub fn is_ok(&self) -> bool {
        match self {
            StatusCode::Number(n) => *n == 0 || *n == 200,
            StatusCode::Text(s) => s.eq_ignore_ascii_case("ok"),
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCode::Number(n) => write!(f, "{}", n),
            StatusCode::Text(s) => f.write_str(s),
        }
    }
}

/// Embedded `status` block of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStatus {
    /// Status code
    pub code: StatusCode,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl WireStatus {
    /// An OK status
    pub fn ok() -> Self {
        WireStatus {
            code: StatusCode::Text("OK".to_string()),
            message: String::new(),
        }
    }
}

/// Wire error types
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum WireError {
    /// A request body could not be encoded
    #[error("failed to encode index request: {0}")]
    Encode(String),

    /// A body is not valid JSON or does not match the envelope
    #[error("malformed index payload: {0}")]
    InvalidJson(String),

    /// The response carried a non-OK status block
    #[error("index reported status {code}: {message}")]
    Status {
        /// Reported code
        code: String,
        /// Reported message
        message: String,
    },
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Encode(msg) => Error::Serialization(msg),
            other => Error::backend_unavailable(other.to_string()),
        }
    }
}
