//! Search requests
//!
//! A [`SearchRequest`] names the query, the consistency level the caller
//! requires, and a [`QueryContext`] that is passed through unmodified to
//! whichever executor runs. Nothing here is ambient: the caller's
//! authorities, tenant and locale travel with the request.

use crate::cancel::CancellationToken;
use crate::consistency::ConsistencyLevel;
use crate::sort::SortDefinition;
use crate::types::TxnId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Store searched when the caller names none
pub const DEFAULT_STORE: &str = "workspace://SpacesStore";

/// Query language assumed when the caller names none
pub const DEFAULT_LANGUAGE: &str = "fts-alfresco";

/// Default boolean operator between full-text terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FtsOperator {
    /// All terms must match
    #[default]
    And,
    /// Any term may match
    Or,
}

/// How a result-size limit is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitBy {
    /// No limit was requested
    #[default]
    Unlimited,
    /// Limit the size of the final result set
    FinalSize,
    /// Limit the number of permission evaluations performed
    NumberOfPermissionEvaluations,
}

/// Paging and size limits
///
/// `None` means "not set", not zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultLimits {
    /// Number of leading results to skip
    pub skip_count: u32,
    /// Hard cap on returned results; wins over everything else
    pub max_items: Option<u32>,
    /// Limit interpreted according to `limit_by`
    pub limit: Option<u32>,
    /// How `limit` is interpreted
    pub limit_by: LimitBy,
    /// Cap on permission evaluations for otherwise unlimited queries
    pub max_permission_checks: Option<u32>,
}

impl ResultLimits {
    /// Final-size cap, if any: `max_items` first, then a final-size `limit`
    pub fn final_size(&self) -> Option<u32> {
        self.max_items.or(match self.limit_by {
            LimitBy::FinalSize => self.limit,
            _ => None,
        })
    }
}

/// Opaque per-request context passed through to executors
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Authority tokens the caller holds (already evaluated upstream)
    pub authorities: Vec<String>,
    /// Tenant domain; `None` is the default domain
    pub tenant: Option<String>,
    /// Locales in preference order
    pub locales: Vec<String>,
    /// Explicit sort order; empty means score order
    pub sort: Vec<SortDefinition>,
    /// Named query templates
    pub templates: BTreeMap<String, String>,
    /// Attributes searched by unqualified text terms
    pub text_attributes: Vec<String>,
    /// Attributes searched by `ALL` terms
    pub all_attributes: Vec<String>,
    /// Namespace for unprefixed property names
    pub default_namespace: Option<String>,
    /// Default operator between full-text terms
    pub default_fts_operator: FtsOperator,
    /// Default operator between terms of a field group
    pub default_fts_field_operator: FtsOperator,
    /// Query language the query string was written in
    pub language: String,
    /// Stores to search
    pub stores: Vec<String>,
    /// Fields to facet on
    pub facet_fields: Vec<String>,
    /// Paging and size limits
    pub limits: ResultLimits,
    /// Per-request deadline for remote calls; `None` uses the configured default
    pub deadline: Option<Duration>,
    /// Cancellation flag observed by executors
    pub cancel: CancellationToken,
}

impl Default for QueryContext {
    fn default() -> Self {
        QueryContext {
            authorities: vec![],
            tenant: None,
            locales: vec![],
            sort: vec![],
            templates: BTreeMap::new(),
            text_attributes: vec![],
            all_attributes: vec![],
            default_namespace: None,
            default_fts_operator: FtsOperator::default(),
            default_fts_field_operator: FtsOperator::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            stores: vec![DEFAULT_STORE.to_string()],
            facet_fields: vec![],
            limits: ResultLimits::default(),
            deadline: None,
            cancel: CancellationToken::default(),
        }
    }
}

/// A query plus the consistency it must be answered with
///
/// # Examples
///
/// ```
/// use tessera_core::{ConsistencyLevel, SearchRequest, SortDefinition};
///
/// let req = SearchRequest::new("TEXT:budget")
///     .with_consistency(ConsistencyLevel::Eventual)
///     .with_authorities(["GROUP_EVERYONE"])
///     .with_sort(SortDefinition::score(false));
///
/// assert_eq!(req.consistency, ConsistencyLevel::Eventual);
/// assert!(req.since_txid().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query string, already parsed and validated upstream
    pub query: String,

    /// Consistency level the caller requires
    pub consistency: ConsistencyLevel,

    /// Pass-through context
    pub context: QueryContext,

    since_txid: Option<TxnId>,
}

impl SearchRequest {
    /// Create a request at `Default` consistency with an empty context
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            consistency: ConsistencyLevel::default(),
            context: QueryContext::default(),
            since_txid: None,
        }
    }

    /// Builder: set consistency level
    pub fn with_consistency(mut self, consistency: ConsistencyLevel) -> Self {
        self.consistency = consistency;
        self
    }

    /// Builder: replace the whole context
    pub fn with_context(mut self, context: QueryContext) -> Self {
        self.context = context;
        self
    }

    /// Builder: set caller authorities
    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set tenant domain
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.context.tenant = Some(tenant.into());
        self
    }

    /// Builder: append a sort definition
    pub fn with_sort(mut self, sort: SortDefinition) -> Self {
        self.context.sort.push(sort);
        self
    }

    /// Builder: set query language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.context.language = language.into();
        self
    }

    /// Builder: set stores to search
    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.stores = stores.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set result limits
    pub fn with_limits(mut self, limits: ResultLimits) -> Self {
        self.context.limits = limits;
        self
    }

    /// Builder: set remote call deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.context.deadline = Some(deadline);
        self
    }

    /// Builder: share a cancellation token with the caller
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.context.cancel = cancel;
        self
    }

    /// Watermark of a delta query: only transactions strictly above it are selected
    pub fn since_txid(&self) -> Option<TxnId> {
        self.since_txid
    }

    /// Whether this is a delta query
    pub fn is_delta(&self) -> bool {
        self.since_txid.is_some()
    }

    /// Derive the delta query for everything committed after `watermark`
    ///
    /// This is the only way `since_txid` gets set; callers never set it.
    pub fn delta_from(&self, watermark: TxnId) -> SearchRequest {
        SearchRequest {
            since_txid: Some(watermark),
            ..self.clone()
        }
    }
}
