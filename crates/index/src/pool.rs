//! HTTP client pool keyed by endpoint
//!
//! One `ureq::Agent` per `scheme://host:port`, created on first use and then
//! shared by every in-flight request to that endpoint. Agents keep their own
//! connection pools, so reuse needs no locking beyond the map shard.
//!
//! Agents never follow redirects; the executor follows one itself so it can
//! report the final URL on failure.

use dashmap::DashMap;
use ureq::{Agent, AgentBuilder};

/// Lazily populated agent registry
#[derive(Debug, Default)]
pub struct ClientPool {
    agents: DashMap<String, Agent>,
}

impl ClientPool {
    /// Create an empty pool
    pub fn new() -> Self {
        ClientPool {
            agents: DashMap::new(),
        }
    }

    /// Agent for `endpoint`, creating it on first use
    pub fn agent(&self, endpoint: &str) -> Agent {
        if let Some(agent) = self.agents.get(endpoint) {
            return agent.clone();
        }
        self.agents
            .entry(endpoint.to_string())
            .or_insert_with(|| AgentBuilder::new().redirects(0).build())
            .clone()
    }

    /// Number of endpoints with an agent
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent has been created yet
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// `scheme://host:port` part of an absolute URL
///
/// Returns `None` for URLs without a scheme or host.
pub fn endpoint_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or(rest);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    if scheme.is_empty() || host_port.is_empty() {
        return None;
    }
    let scheme = scheme.to_ascii_lowercase();
    if host_port.contains(':') && !host_port.ends_with(']') {
        Some(format!("{}://{}", scheme, host_port))
    } else {
        let port = match scheme.as_str() {
            "https" => 443,
            _ => 80,
        };
        Some(format!("{}://{}:{}", scheme, host_port, port))
    }
}
