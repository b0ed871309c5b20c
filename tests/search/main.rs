//! Search Integration Tests
//!
//! Tests for the tessera facade: strategy routing, fallback, the hybrid
//! merge and configuration loading.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod fallback;
mod hybrid;
mod routing;
