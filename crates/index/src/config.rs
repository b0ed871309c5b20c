//! Index executor configuration
//!
//! Every field has a default, so a TOML table may name only what it changes:
//!
//! ```toml
//! timeout_ms = 5000
//!
//! [[store_mappings]]
//! store = "workspace://SpacesStore"
//! base_url = "http://localhost:8983/solr/alfresco"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Handler used for a query language with no mapping
pub const DEFAULT_LANGUAGE_FRAGMENT: &str = "afts";

/// Largest row count the index accepts; it reads `rows` as a signed 32-bit int
pub const MAX_ROWS: u32 = i32::MAX as u32;

/// Where a store's index lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMapping {
    /// Store reference, e.g. `workspace://SpacesStore`
    pub store: String,
    /// Base URL of the index core
    pub base_url: String,
    /// Shard addresses (`host:port/path`); more than one means sharded
    #[serde(default)]
    pub shards: Vec<String>,
}

impl StoreMapping {
    /// Create an unsharded mapping
    pub fn new(store: impl Into<String>, base_url: impl Into<String>) -> Self {
        StoreMapping {
            store: store.into(),
            base_url: base_url.into(),
            shards: vec![],
        }
    }

    /// Builder: set shard addresses
    pub fn with_shards<I, S>(mut self, shards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shards = shards.into_iter().map(Into::into).collect();
        self
    }

    /// Whether queries fan out over several shards
    pub fn is_sharded(&self) -> bool {
        self.shards.len() > 1
    }

    /// Value contributed to the `shards` URL parameter
    pub(crate) fn shard_list(&self) -> String {
        if self.shards.is_empty() {
            // Unsharded cores are addressed by their own location
            let base = self.base_url.trim_end_matches('/');
            base.split_once("://")
                .map(|(_, rest)| rest)
                .unwrap_or(base)
                .to_string()
        } else {
            self.shards.join(",")
        }
    }
}

/// Configuration of the HTTP index executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Store to index-core mappings
    pub store_mappings: Vec<StoreMapping>,
    /// Query language to URL handler fragment
    pub language_mappings: BTreeMap<String, String>,
    /// Default per-call deadline in milliseconds
    pub timeout_ms: u64,
    /// Row count requested when the caller sets no limit at all
    pub max_results_from_unlimited_query: u32,
    /// Per-field facet limit against an unsharded core
    pub default_unsharded_facet_limit: u32,
    /// Per-field facet limit when the query fans out over shards
    pub default_sharded_facet_limit: u32,
    /// Forward `GROUP_` authorities for administrators
    pub include_groups_for_role_admin: bool,
    /// A single deny entry denies access as a whole
    pub any_deny_denies: bool,
    /// Locale sent when the request names none
    pub default_locale: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let language_mappings = [
            ("lucene", "alfresco"),
            ("fts-alfresco", "afts"),
            ("cmis-strict", "cmis"),
            ("cmis-alfresco", "cmis"),
        ]
        .into_iter()
        .map(|(language, fragment)| (language.to_string(), fragment.to_string()))
        .collect();

        IndexConfig {
            store_mappings: vec![],
            language_mappings,
            timeout_ms: 30_000,
            max_results_from_unlimited_query: MAX_ROWS,
            default_unsharded_facet_limit: 100,
            default_sharded_facet_limit: 20,
            include_groups_for_role_admin: false,
            any_deny_denies: false,
            default_locale: "en".to_string(),
        }
    }
}

impl IndexConfig {
    /// Builder: add a store mapping
    pub fn with_store(mut self, mapping: StoreMapping) -> Self {
        self.store_mappings.push(mapping);
        self
    }

    /// Builder: set the default deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Mapping for `store`, if configured
    pub fn mapping_for(&self, store: &str) -> Option<&StoreMapping> {
        self.store_mappings.iter().find(|m| m.store == store)
    }

    /// URL handler fragment for a query language (case-insensitive)
    pub fn language_fragment(&self, language: &str) -> &str {
        self.language_mappings
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(language))
            .map(|(_, fragment)| fragment.as_str())
            .unwrap_or(DEFAULT_LANGUAGE_FRAGMENT)
    }

    /// Default per-call deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
