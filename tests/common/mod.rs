//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use tessera::prelude::*;
pub use tessera::{
    CancellationToken, ChangeFeed, ChangedEntity, DbQueryExecutor, EntityRef, FacetCount,
    FieldValue, IndexConfig, IndexQueryExecutor, ResultEntry, ResultLimits, StoreMapping, TxnId,
};
pub use tessera_index::{HttpCall, HttpReply, Transport, TransportError};

pub const STORE: &str = "workspace://SpacesStore";
pub const INDEX_URL: &str = "http://index.test:8983/solr/alfresco";

/// Route test output through the harness; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn refs(set: &ResultSet) -> Vec<String> {
    set.entity_refs().iter().map(|e| e.to_string()).collect()
}

pub fn result_set(ids: &[&str]) -> ResultSet {
    let entries = ids.iter().map(|id| ResultEntry::new(*id, 0.5)).collect::<Vec<_>>();
    let total = entries.len() as u64;
    ResultSet::new(entries, total, false)
}

// ============================================================================
// Counting executors
// ============================================================================

/// Index executor with a fixed answer
pub struct MockIndex {
    answer: tessera_core::Result<ResultSet>,
    calls: AtomicUsize,
}

impl MockIndex {
    pub fn answering(answer: tessera_core::Result<ResultSet>) -> Arc<Self> {
        Arc::new(MockIndex {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IndexQueryExecutor for MockIndex {
    fn query(&self, _req: &SearchRequest) -> tessera_core::Result<ResultSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// Transactional executor with a fixed answer; records the delta bound
pub struct MockDb {
    answer: tessera_core::Result<ResultSet>,
    seen: Mutex<Vec<Option<TxnId>>>,
}

impl MockDb {
    pub fn answering(answer: tessera_core::Result<ResultSet>) -> Arc<Self> {
        Arc::new(MockDb {
            answer,
            seen: Mutex::new(vec![]),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn seen_since(&self) -> Vec<Option<TxnId>> {
        self.seen.lock().clone()
    }
}

impl DbQueryExecutor for MockDb {
    fn query(&self, req: &SearchRequest) -> tessera_core::Result<ResultSet> {
        self.seen.lock().push(req.since_txid());
        self.answer.clone()
    }
}

/// Change feed with a fixed answer
pub struct MockFeed {
    answer: tessera_core::Result<Vec<ChangedEntity>>,
    calls: AtomicUsize,
}

impl MockFeed {
    pub fn answering(answer: tessera_core::Result<Vec<ChangedEntity>>) -> Arc<Self> {
        Arc::new(MockFeed {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChangeFeed for MockFeed {
    fn changed_since(&self, _watermark: TxnId) -> tessera_core::Result<Vec<ChangedEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

// ============================================================================
// Scripted index transport
// ============================================================================

/// Replies from a script and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<std::result::Result<HttpReply, TransportError>>>,
    calls: Mutex<Vec<HttpCall>>,
}

impl ScriptedTransport {
    pub fn replying(replies: Vec<std::result::Result<HttpReply, TransportError>>) -> Arc<Self> {
        Arc::new(ScriptedTransport {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(vec![]),
        })
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.calls.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    fn post_json(&self, call: &HttpCall) -> std::result::Result<HttpReply, TransportError> {
        self.calls.lock().push(call.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("script exhausted".into())))
    }
}

pub fn index_config() -> IndexConfig {
    IndexConfig::default().with_store(StoreMapping::new(STORE, INDEX_URL))
}

/// Index response body listing `ids` as of `watermark`
pub fn index_body(ids: &[&str], watermark: Option<u64>) -> String {
    let rows: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "entityRef": id, "score": 0.5 }))
        .collect();
    let mut body = serde_json::json!({
        "rows": rows,
        "numFound": ids.len(),
        "start": 0,
    });
    if let Some(txid) = watermark {
        body["lastIndexedTxId"] = serde_json::json!(txid);
    }
    body.to_string()
}

/// Tessera over `store` with the index answered by `transport`
pub fn tessera_over(store: Arc<MemoryStore>, transport: Arc<ScriptedTransport>) -> Tessera {
    let index = tessera_index::HttpIndexExecutor::with_transport(index_config(), transport);
    Tessera::builder()
        .hybrid_enabled(true)
        .db(Arc::new(tessera::StoreQueryExecutor::new(Arc::clone(&store))))
        .change_feed(Arc::new(tessera::StoreChangeFeed::new(store)))
        .index(Arc::new(index))
        .build()
        .unwrap()
}
