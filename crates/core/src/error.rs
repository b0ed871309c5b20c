//! Error taxonomy for query routing
//!
//! ## Error Codes (Canonical)
//!
//! These codes are frozen and must not change:
//!
//! | Code | Description |
//! |------|-------------|
//! | QueryUnavailable | No executor is configured for the strategy the level implies |
//! | QueryModelException | The transactional store cannot express the query |
//! | BackendUnavailable | Network, timeout or protocol failure talking to a backend |
//! | DisabledFeatureException | Hybrid requested while it is switched off |
//! | Cancelled | The caller abandoned the request |
//! | InvalidRequest | The request violates an API-level invariant |
//! | SerializationError | A payload could not be encoded or decoded |
//! | Internal | Bug or invariant violation |

use crate::consistency::ConsistencyLevel;
use thiserror::Error;

/// All routing errors.
///
/// Only [`Error::QueryModel`] is ever absorbed internally (as the fallback
/// signal for `Default`/`TransactionalIfPossible`); every other variant is
/// surfaced to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The strategy implied by the requested level has no configured executor
    #[error("query unavailable at {consistency} consistency: {reason}")]
    QueryUnavailable {
        /// Level that was requested
        consistency: ConsistencyLevel,
        /// What is missing
        reason: String,
    },

    /// The transactional store cannot express the query
    #[error("query model exception: {reason}")]
    QueryModel {
        /// Construct that is not supported
        reason: String,
    },

    /// Network, timeout or protocol failure talking to a backend
    #[error("backend unavailable: {reason}")]
    BackendUnavailable {
        /// Failure description
        reason: String,
    },

    /// A feature required by the request is switched off
    #[error("disabled feature: {feature}")]
    DisabledFeature {
        /// Feature name
        feature: String,
    },

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// The request violates an API-level invariant
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A payload could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::QueryModel`]
    pub fn query_model(reason: impl Into<String>) -> Self {
        Error::QueryModel {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::BackendUnavailable`]
    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        Error::BackendUnavailable {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::QueryUnavailable`]
    pub fn query_unavailable(consistency: ConsistencyLevel, reason: impl Into<String>) -> Self {
        Error::QueryUnavailable {
            consistency,
            reason: reason.into(),
        }
    }

    /// Get the canonical error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::QueryUnavailable { .. } => "QueryUnavailable",
            Error::QueryModel { .. } => "QueryModelException",
            Error::BackendUnavailable { .. } => "BackendUnavailable",
            Error::DisabledFeature { .. } => "DisabledFeatureException",
            Error::Cancelled => "Cancelled",
            Error::InvalidRequest(_) => "InvalidRequest",
            Error::Serialization(_) => "SerializationError",
            Error::Internal(_) => "Internal",
        }
    }

    /// Check if this error asks the router to try the index instead.
    pub fn is_fallback_signal(&self) -> bool {
        matches!(self, Error::QueryModel { .. })
    }

    /// Check if this error is retryable at this layer.
    ///
    /// The router never retries; transient network errors are the transport's
    /// concern, so this is always `false`.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Check if a backend could not be reached.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Error::BackendUnavailable { .. })
    }
}
