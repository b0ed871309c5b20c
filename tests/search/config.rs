//! Configuration Tests
//!
//! Loading `TesseraConfig` from disk.

use crate::common::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn loads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tessera.toml");
    fs::write(
        &path,
        r#"
        hybrid_enabled = true

        [index]
        timeout_ms = 2500
        default_locale = "fr"

        [[index.store_mappings]]
        store = "workspace://SpacesStore"
        base_url = "https://index.internal/solr/alfresco"
        shards = ["index-a:8983/solr/alfresco", "index-b:8983/solr/alfresco"]
        "#,
    )
    .unwrap();

    let config = TesseraConfig::from_path(&path).unwrap();

    assert!(config.hybrid_enabled);
    let index = config.index.as_ref().unwrap();
    assert_eq!(index.timeout_ms, 2500);
    assert_eq!(index.default_locale, "fr");
    assert!(index.mapping_for(STORE).unwrap().is_sharded());
    // Defaults survive a partial [index] table
    assert_eq!(index.language_fragment("fts-alfresco"), "afts");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = TesseraConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tessera.toml");
    fs::write(&path, "hybrid_enabled = [").unwrap();

    let err = TesseraConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn config_without_index_serves_store_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tessera.toml");
    fs::write(&path, "hybrid_enabled = true\n").unwrap();

    let config = TesseraConfig::from_path(&path).unwrap();
    let tessera = Tessera::with_store(config, Arc::new(MemoryStore::new())).unwrap();

    let err = tessera
        .search(&SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Hybrid))
        .unwrap_err();
    assert!(err.is_disabled_feature());

    let err = tessera
        .search(&SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Eventual))
        .unwrap_err();
    assert!(err.is_unavailable());
}
