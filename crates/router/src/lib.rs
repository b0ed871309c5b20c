//! Consistency-aware query routing for Tessera
//!
//! A [`ConsistencyRouter`] turns a request's [`ConsistencyLevel`] into a
//! [`Strategy`] and runs it:
//!
//! - `IndexOnly`: the eventually-consistent index
//! - `DbOnly`: the transactional store
//! - `Opportunistic`: the store, falling back to the index when the store
//!   cannot express the query
//! - `Hybrid`: index results patched by [`HybridMerger`] with a
//!   transactional delta past the index watermark
//!
//! [`ConsistencyLevel`]: tessera_core::ConsistencyLevel

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod merger;
pub mod router;
pub mod strategy;

pub use merger::HybridMerger;
pub use router::{ConsistencyRouter, RouterBuilder, RouterOptions};
pub use strategy::{resolve, Availability, Strategy, HYBRID_FEATURE};
