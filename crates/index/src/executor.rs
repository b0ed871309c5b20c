//! `IndexQueryExecutor` over HTTP
//!
//! # Request Shape
//!
//! ```text
//! POST <base_url>/<language fragment>?wt=json&fl=DBID,score&rows=..&start=..&locale=..
//!      [&sort=..][&shards=..][&facet=true&facet.field=<f>&f.<f>.facet.limit=..]
//!
//! {"query": "...", "authorities": [...], "tenants": [...], ...}
//! ```
//!
//! # Threads
//!
//! Every call runs on its own short-lived OS thread while the calling thread
//! watches the request's cancellation token and deadline. Cancellation and
//! deadline expiry abandon the call rather than abort it: the worker keeps
//! its connection until the transport answers or its own timeout (the same
//! deadline) fires, and its reply is then dropped. Under sustained
//! cancellation a caller can therefore hold up to one extra thread and
//! connection per abandoned call for at most one deadline.

use crate::config::{IndexConfig, StoreMapping, MAX_ROWS};
use crate::transport::{HttpCall, HttpReply, Transport, TransportError, UreqTransport};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tessera_core::{
    CancellationToken, Error, IndexQueryExecutor, Result, ResultLimits, ResultSet, SearchRequest,
};
use tessera_wire::{decode_response, encode_request, IndexRequest, QueryTemplate};
use tracing::debug;

/// Authority held by repository administrators
pub const ROLE_ADMINISTRATOR: &str = "ROLE_ADMINISTRATOR";

/// Prefix of group authorities
pub const GROUP_PREFIX: &str = "GROUP_";

/// How often a waiting caller checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Executes queries against the remote index
pub struct HttpIndexExecutor {
    config: IndexConfig,
    transport: Arc<dyn Transport>,
}

impl HttpIndexExecutor {
    /// Create an executor over pooled HTTP clients
    pub fn new(config: IndexConfig) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    /// Create an executor over an explicit transport
    pub fn with_transport(config: IndexConfig, transport: Arc<dyn Transport>) -> Self {
        HttpIndexExecutor { config, transport }
    }

    /// Configuration in use
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn mapping(&self, req: &SearchRequest, store: &str) -> Result<&StoreMapping> {
        self.config.mapping_for(store).ok_or_else(|| {
            Error::query_unavailable(
                req.consistency,
                format!("no index is mapped for store {}", store),
            )
        })
    }

    /// Rows to request, following the caller's limits
    fn requested_rows(&self, limits: &ResultLimits) -> u32 {
        limits
            .final_size()
            .or(limits.max_permission_checks)
            .unwrap_or(self.config.max_results_from_unlimited_query)
            .min(MAX_ROWS)
    }

    /// `facet` and per-field `facet.*` params for the requested facet fields
    fn facet_params(&self, fields: &[String], sharded: bool) -> Vec<(String, String)> {
        if fields.is_empty() {
            return vec![];
        }
        let limit = if sharded {
            self.config.default_sharded_facet_limit
        } else {
            self.config.default_unsharded_facet_limit
        };
        let mut params = vec![("facet".to_string(), "true".to_string())];
        for field in fields {
            params.push(("facet.field".to_string(), field.clone()));
            params.push((format!("f.{}.facet.limit", field), limit.to_string()));
        }
        params
    }

    /// Authorities forwarded to the index
    ///
    /// Administrators see everything, so their group memberships only bloat
    /// the filter unless configured otherwise.
    fn forwarded_authorities(&self, authorities: &[String]) -> Vec<String> {
        let is_admin = authorities.iter().any(|a| a == ROLE_ADMINISTRATOR);
        if !is_admin || self.config.include_groups_for_role_admin {
            return authorities.to_vec();
        }
        authorities
            .iter()
            .filter(|a| !a.starts_with(GROUP_PREFIX))
            .cloned()
            .collect()
    }

    fn build_call(&self, req: &SearchRequest) -> Result<HttpCall> {
        let ctx = &req.context;
        let store = ctx.stores.first().ok_or_else(|| {
            Error::InvalidRequest("request names no store to search".to_string())
        })?;
        let mapping = self.mapping(req, store)?;

        let url = format!(
            "{}/{}",
            mapping.base_url.trim_end_matches('/'),
            self.config.language_fragment(&ctx.language)
        );

        let locales = if ctx.locales.is_empty() {
            vec![self.config.default_locale.clone()]
        } else {
            ctx.locales.clone()
        };

        let mut params = vec![
            ("wt".to_string(), "json".to_string()),
            ("fl".to_string(), "DBID,score".to_string()),
            ("rows".to_string(), self.requested_rows(&ctx.limits).to_string()),
            ("start".to_string(), ctx.limits.skip_count.to_string()),
            ("locale".to_string(), locales[0].clone()),
        ];
        if !ctx.sort.is_empty() {
            let clauses: Vec<String> = ctx.sort.iter().map(|s| s.clause()).collect();
            params.push(("sort".to_string(), clauses.join(",")));
        }
        let sharded = ctx.stores.len() > 1 || mapping.is_sharded();
        if sharded {
            let shards = ctx
                .stores
                .iter()
                .map(|s| self.mapping(req, s).map(StoreMapping::shard_list))
                .collect::<Result<Vec<_>>>()?;
            params.push(("shards".to_string(), shards.join(",")));
        }
        params.extend(self.facet_params(&ctx.facet_fields, sharded));

        let body = IndexRequest {
            query: req.query.clone(),
            authorities: self.forwarded_authorities(&ctx.authorities),
            any_deny_denies: self.config.any_deny_denies,
            tenants: vec![ctx.tenant.clone().unwrap_or_default()],
            locales,
            templates: ctx
                .templates
                .iter()
                .map(|(name, template)| QueryTemplate {
                    name: name.clone(),
                    template: template.clone(),
                })
                .collect(),
            sort: ctx.sort.iter().map(|s| s.clause()).collect(),
            consistency_hint: req.consistency,
            text_attributes: ctx.text_attributes.clone(),
            all_attributes: ctx.all_attributes.clone(),
            default_fts_operator: ctx.default_fts_operator,
            default_fts_field_operator: ctx.default_fts_field_operator,
            default_namespace: ctx.default_namespace.clone(),
        };

        Ok(HttpCall {
            url,
            params,
            body: encode_request(&body)?,
            timeout: ctx.deadline.unwrap_or_else(|| self.config.timeout()),
        })
    }

    /// Send `call` on a worker thread, watching `cancel` and the deadline
    fn send(&self, call: HttpCall, cancel: &CancellationToken) -> Result<HttpReply> {
        cancel.check()?;

        let started = Instant::now();
        let timeout = call.timeout;
        let url = call.display_url();
        let transport = Arc::clone(&self.transport);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("tessera-index-call".to_string())
            .spawn(move || {
                // The receiver is gone once the caller gave up
                let _ = tx.send(transport.post_json(&call));
            })
            .map_err(|e| Error::Internal(format!("failed to spawn index call: {}", e)))?;

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(reply) => return reply.map_err(|e| transport_failure(e, &url)),
                Err(RecvTimeoutError::Timeout) => {
                    if cancel.is_cancelled() {
                        debug!(url = %url, "index call cancelled");
                        return Err(Error::Cancelled);
                    }
                    if started.elapsed() >= timeout {
                        return Err(transport_failure(TransportError::Timeout(timeout), &url));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::Internal(format!(
                        "index call to {} ended without a reply",
                        url
                    )))
                }
            }
        }
    }
}

fn transport_failure(e: TransportError, url: &str) -> Error {
    match e {
        TransportError::Timeout(after) => {
            Error::backend_unavailable(format!("timed out after {:?} calling {}", after, url))
        }
        other => Error::backend_unavailable(format!("{} calling {}", other, url)),
    }
}

impl IndexQueryExecutor for HttpIndexExecutor {
    fn query(&self, req: &SearchRequest) -> Result<ResultSet> {
        let call = self.build_call(req)?;
        let cancel = &req.context.cancel;
        let started = Instant::now();

        debug!(url = %call.display_url(), "Sent");
        debug!(body = %call.body, "with");

        let mut url = call.display_url();
        let mut reply = self.send(call.clone(), cancel)?;
        if let Some(location) = reply.redirect_target().map(str::to_string) {
            debug!(from = %url, to = %location, "following redirect");
            let redirected = HttpCall {
                url: location,
                params: vec![],
                ..call
            };
            url = redirected.display_url();
            reply = self.send(redirected, cancel)?;
        }

        if !reply.is_success() {
            return Err(Error::backend_unavailable(format!(
                "request failed {} {}",
                reply.status, url
            )));
        }

        let response = decode_response(&reply.body)?;
        let elapsed_ms = response
            .query_time
            .unwrap_or_else(|| started.elapsed().as_millis() as u64);
        debug!(
            found = response.num_found,
            elapsed_ms,
            watermark = ?response.watermark(),
            "Got {} in {} ms",
            response.num_found,
            elapsed_ms
        );

        Ok(response.into_result_set())
    }
}
