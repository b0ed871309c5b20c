//! TOML configuration.
//!
//! ```toml
//! hybrid_enabled = true
//!
//! [index]
//! timeout_ms = 10000
//!
//! [[index.store_mappings]]
//! store = "workspace://SpacesStore"
//! base_url = "http://localhost:8983/solr/alfresco"
//! ```
//!
//! Omitting `[index]` leaves the index executor unconfigured.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_index::IndexConfig;
use tessera_router::RouterOptions;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Gate for the `Hybrid` consistency level
    pub hybrid_enabled: bool,
    /// Remote index settings; `None` means no index executor
    pub index: Option<IndexConfig>,
}

impl TesseraConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TesseraConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Builder: switch hybrid on or off
    pub fn with_hybrid(mut self, enabled: bool) -> Self {
        self.hybrid_enabled = enabled;
        self
    }

    /// Builder: configure the remote index
    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = Some(index);
        self
    }

    /// Router options derived from this configuration
    pub fn router_options(&self) -> RouterOptions {
        RouterOptions::new().hybrid_enabled(self.hybrid_enabled)
    }

    /// Reject configurations that cannot serve any index query
    pub fn validate(&self) -> Result<()> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        if index.store_mappings.is_empty() {
            return Err(Error::Config(
                "[index] is present but maps no stores".to_string(),
            ));
        }
        if let Some(mapping) = index
            .store_mappings
            .iter()
            .find(|m| !m.base_url.contains("://"))
        {
            return Err(Error::Config(format!(
                "store {} has a base_url without a scheme: {}",
                mapping.store, mapping.base_url
            )));
        }
        if index.timeout_ms == 0 {
            return Err(Error::Config("index timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}
