//! Blocking HTTP transport
//!
//! The executor talks to the index through [`Transport`] so tests can script
//! replies without a network. [`UreqTransport`] is the production
//! implementation over the endpoint-keyed [`ClientPool`].

use crate::pool::{endpoint_of, ClientPool};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// One POST of a JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCall {
    /// Absolute URL without query parameters
    pub url: String,
    /// Query parameters, encoded by the transport
    pub params: Vec<(String, String)>,
    /// JSON body
    pub body: String,
    /// Deadline for the whole exchange
    pub timeout: Duration,
}

impl HttpCall {
    /// URL with parameters, for diagnostics
    pub fn display_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// Status, redirect target and body of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// `Location` header, if any
    pub location: Option<String>,
    /// Response body
    pub body: String,
}

impl HttpReply {
    /// A 200 reply with `body`
    pub fn ok(body: impl Into<String>) -> Self {
        HttpReply {
            status: 200,
            location: None,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Redirect target, when the status is 301 or 302
    pub fn redirect_target(&self) -> Option<&str> {
        match self.status {
            301 | 302 => self.location.as_deref(),
            _ => None,
        }
    }
}

/// Failures below the HTTP status level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The exchange did not finish within its deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// No connection could be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other I/O failure
    #[error("i/o error: {0}")]
    Io(String),
}

/// Sends JSON bodies to the index
pub trait Transport: Send + Sync {
    /// POST `call.body` to `call.url` and return the raw reply
    ///
    /// Non-2xx statuses are replies, not errors. Redirects are not followed.
    fn post_json(&self, call: &HttpCall) -> Result<HttpReply, TransportError>;
}

/// [`Transport`] over pooled `ureq` agents
#[derive(Debug, Default)]
pub struct UreqTransport {
    pool: ClientPool,
}

impl UreqTransport {
    /// Create a transport with an empty pool
    pub fn new() -> Self {
        UreqTransport {
            pool: ClientPool::new(),
        }
    }

    /// The underlying pool
    pub fn pool(&self) -> &ClientPool {
        &self.pool
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, call: &HttpCall) -> Result<HttpReply, TransportError> {
        let endpoint = endpoint_of(&call.url)
            .ok_or_else(|| TransportError::Connect(format!("invalid url {}", call.url)))?;
        let agent = self.pool.agent(&endpoint);

        let mut request = agent
            .post(&call.url)
            .timeout(call.timeout)
            .set("Content-Type", "application/json; charset=UTF-8");
        for (name, value) in &call.params {
            request = request.query(name, value);
        }

        let response = match request.send_string(&call.body) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(classify(&transport, call.timeout))
            }
        };

        let status = response.status();
        let location = response.header("Location").map(str::to_string);
        let body = response
            .into_string()
            .map_err(|e| io_failure(&e, call.timeout))?;
        Ok(HttpReply {
            status,
            location,
            body,
        })
    }
}

fn classify(transport: &ureq::Transport, timeout: Duration) -> TransportError {
    match transport.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
            TransportError::Connect(transport.to_string())
        }
        ureq::ErrorKind::Io => {
            let source = std::error::Error::source(transport)
                .and_then(|s| s.downcast_ref::<io::Error>());
            match source {
                Some(e) => io_failure(e, timeout),
                None => TransportError::Io(transport.to_string()),
            }
        }
        _ => TransportError::Io(transport.to_string()),
    }
}

fn io_failure(e: &io::Error, timeout: Duration) -> TransportError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout(timeout),
        _ => TransportError::Io(e.to_string()),
    }
}
