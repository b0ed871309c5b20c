//! Unified error types for Tessera.
//!
//! This module provides one error type for everything the facade does:
//! routing failures from the router and executors, plus configuration and
//! I/O failures from loading settings.

use tessera_core::ConsistencyLevel;
use thiserror::Error;

/// All Tessera errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No executor is configured for the strategy the level implies
    #[error("query unavailable at {consistency} consistency: {reason}")]
    QueryUnavailable {
        /// Level that was requested
        consistency: ConsistencyLevel,
        /// What is missing
        reason: String,
    },

    /// The transactional store cannot express the query
    #[error("query model exception: {0}")]
    QueryModel(String),

    /// Network, timeout or protocol failure talking to a backend
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A feature the request needs is switched off
    #[error("disabled feature: {0}")]
    DisabledFeature(String),

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// The request violates an API-level invariant
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be parsed or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Tessera operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error may clear up on a later attempt.
    ///
    /// Nothing in Tessera retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_))
    }

    /// Check if the requested consistency cannot be served as configured.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::QueryUnavailable { .. })
    }

    /// Check if the request hit a switched-off feature.
    pub fn is_disabled_feature(&self) -> bool {
        matches!(self, Error::DisabledFeature(_))
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

// Convert from routing errors
impl From<tessera_core::Error> for Error {
    fn from(e: tessera_core::Error) -> Self {
        use tessera_core::Error as CoreError;
        match e {
            CoreError::QueryUnavailable {
                consistency,
                reason,
            } => Error::QueryUnavailable {
                consistency,
                reason,
            },
            CoreError::QueryModel { reason } => Error::QueryModel(reason),
            CoreError::BackendUnavailable { reason } => Error::BackendUnavailable(reason),
            CoreError::DisabledFeature { feature } => Error::DisabledFeature(feature),
            CoreError::Cancelled => Error::Cancelled,
            CoreError::InvalidRequest(msg) => Error::InvalidRequest(msg),
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
