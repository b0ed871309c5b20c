//! Index request body

use super::error::WireError;
use serde::{Deserialize, Serialize};
use tessera_core::{ConsistencyLevel, FtsOperator};

/// Named query template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    /// Template name referenced from the query
    pub name: String,
    /// Template expansion
    pub template: String,
}

/// Body POSTed to the index query handler
///
/// Authorities go over as-is; tenant mangling and permission filtering take
/// place on the index side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    /// Query string
    pub query: String,
    /// Caller authorities
    pub authorities: Vec<String>,
    /// Whether a single deny entry denies access as a whole
    #[serde(default)]
    pub any_deny_denies: bool,
    /// Tenant domains
    pub tenants: Vec<String>,
    /// Locales
    pub locales: Vec<String>,
    /// Query templates
    #[serde(default)]
    pub templates: Vec<QueryTemplate>,
    /// Sort clauses, e.g. `score desc`
    #[serde(default)]
    pub sort: Vec<String>,
    /// Consistency the caller asked for
    pub consistency_hint: ConsistencyLevel,
    /// Attributes for unqualified text terms
    #[serde(default)]
    pub text_attributes: Vec<String>,
    /// Attributes for `ALL` terms
    #[serde(default)]
    pub all_attributes: Vec<String>,
    /// Default operator between full-text terms
    #[serde(default, rename = "defaultFTSOperator")]
    pub default_fts_operator: FtsOperator,
    /// Default operator inside field groups
    #[serde(default, rename = "defaultFTSFieldOperator")]
    pub default_fts_field_operator: FtsOperator,
    /// Namespace for unprefixed property names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,
}

/// Encode a request body
pub fn encode_request(request: &IndexRequest) -> Result<String, WireError> {
    serde_json::to_string(request).map_err(|e| WireError::Encode(e.to_string()))
}

/// Decode a request body
pub fn decode_request(json: &str) -> Result<IndexRequest, WireError> {
    serde_json::from_str(json).map_err(|e| WireError::InvalidJson(e.to_string()))
}
