//! Hybrid Tests
//!
//! The index answer is patched with whatever the transactional store
//! committed after the index's watermark.

use crate::common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn hybrid(query: &str) -> SearchRequest {
    SearchRequest::new(query).with_consistency(ConsistencyLevel::Hybrid)
}

fn hybrid_tessera(db: Arc<MockDb>, index: Arc<MockIndex>, feed: Arc<MockFeed>) -> Tessera {
    Tessera::builder()
        .hybrid_enabled(true)
        .db(db)
        .index(index)
        .change_feed(feed)
        .build()
        .unwrap()
}

// ============================================================================
// Merge through the facade
// ============================================================================

#[test]
fn stale_index_entry_is_replaced_by_delta() {
    init_tracing();
    let index = MockIndex::answering(Ok(
        result_set(&["n1", "n2", "n7"]).with_watermark(TxnId::new(5)),
    ));
    let feed = MockFeed::answering(Ok(vec![ChangedEntity::new("n7", TxnId::new(6))]));
    let db = MockDb::answering(Ok(ResultSet::new(
        vec![
            ResultEntry::new("n7", 1.0).with_field("cm:name", "fresh"),
            ResultEntry::new("n9", 1.0),
        ],
        2,
        false,
    )));
    let tessera = hybrid_tessera(db.clone(), index, feed);

    let set = tessera.search(&hybrid("TEXT:budget")).unwrap();

    assert_eq!(refs(&set), ["n1", "n2", "n7", "n9"]);
    assert_eq!(set.total_found(), 4);
    assert_eq!(
        set.entries()[2].fields.get("cm:name"),
        Some(&FieldValue::from("fresh"))
    );
    assert_eq!(db.seen_since(), vec![Some(TxnId::new(5))]);
    assert!(set.last_indexed_txid().is_none());
}

#[test]
fn index_without_watermark_is_returned_as_is() {
    let index = MockIndex::answering(Ok(result_set(&["n1", "n2"])));
    let feed = MockFeed::answering(Ok(vec![]));
    let db = MockDb::answering(Ok(result_set(&["n9"])));
    let tessera = hybrid_tessera(db.clone(), index, feed.clone());

    let set = tessera.search(&hybrid("TEXT:budget")).unwrap();

    assert_eq!(refs(&set), ["n1", "n2"]);
    assert_eq!(db.calls(), 0);
    assert_eq!(feed.calls(), 0);
}

#[test]
fn hybrid_is_off_unless_enabled() {
    let db = MockDb::answering(Ok(ResultSet::empty()));
    let index = MockIndex::answering(Ok(ResultSet::empty()));
    let feed = MockFeed::answering(Ok(vec![]));
    let tessera = Tessera::builder()
        .db(db.clone())
        .index(index.clone())
        .change_feed(feed)
        .build()
        .unwrap();

    let err = tessera.search(&hybrid("q")).unwrap_err();

    assert!(err.is_disabled_feature());
    assert_eq!(db.calls() + index.calls(), 0);
}

#[test]
fn hybrid_without_feed_names_what_is_missing() {
    let db = MockDb::answering(Ok(ResultSet::empty()));
    let index = MockIndex::answering(Ok(ResultSet::empty()));
    let tessera = Tessera::builder()
        .hybrid_enabled(true)
        .db(db)
        .index(index.clone())
        .build()
        .unwrap();

    let err = tessera.search(&hybrid("q")).unwrap_err();

    assert!(matches!(&err, Error::DisabledFeature(feature) if feature.contains("change feed")));
    assert_eq!(index.calls(), 0);
}

#[test]
fn page_offset_is_not_applied_to_delta() {
    let store = Arc::new(MemoryStore::new());
    let index = MockIndex::answering(Ok(ResultSet::empty().with_watermark(TxnId::ZERO)));
    store.put(Node::new("n1").with_text("budget")).unwrap();
    store.put(Node::new("n2").with_text("budget")).unwrap();
    let tessera = Tessera::builder()
        .hybrid_enabled(true)
        .db(Arc::new(tessera::StoreQueryExecutor::new(Arc::clone(&store))))
        .change_feed(Arc::new(tessera::StoreChangeFeed::new(store)))
        .index(index)
        .build()
        .unwrap();

    let req = hybrid("TEXT:budget").with_limits(ResultLimits {
        skip_count: 10,
        ..ResultLimits::default()
    });
    let set = tessera.search(&req).unwrap();

    assert_eq!(refs(&set), ["n1", "n2"]);
}

// ============================================================================
// Against the reference store
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Put { id: u8, matching: bool },
    Delete { id: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..8, any::<bool>()).prop_map(|(id, matching)| Op::Put { id, matching }),
        1 => (0u8..8).prop_map(|id| Op::Delete { id }),
    ]
}

fn apply(store: &MemoryStore, op: &Op) {
    match op {
        Op::Put { id, matching } => {
            let text = if *matching { "budget report" } else { "holiday plan" };
            store.put(Node::new(format!("n{}", id)).with_text(text)).unwrap();
        }
        Op::Delete { id } => {
            store.delete(format!("n{}", id)).unwrap();
        }
    }
}

fn ids(set: &ResultSet) -> BTreeSet<String> {
    refs(set).into_iter().collect()
}

proptest! {
    /// An index accurate as of its watermark plus the delta equals a fresh
    /// transactional read.
    #[test]
    fn hybrid_matches_transactional_read(
        indexed in proptest::collection::vec(op(), 0..12),
        recent in proptest::collection::vec(op(), 0..12),
    ) {
        let store = Arc::new(MemoryStore::new());
        for op in &indexed {
            apply(&store, op);
        }

        let transactional = Tessera::with_store(TesseraConfig::default(), Arc::clone(&store)).unwrap();
        let read = |t: &Tessera, level: ConsistencyLevel| t
            .search(&SearchRequest::new("TEXT:budget").with_consistency(level))
            .unwrap();

        let snapshot = read(&transactional, ConsistencyLevel::Transactional)
            .with_watermark(store.last_committed());
        let index = MockIndex::answering(Ok(snapshot));

        for op in &recent {
            apply(&store, op);
        }

        let tessera = Tessera::builder()
            .hybrid_enabled(true)
            .db(Arc::new(tessera::StoreQueryExecutor::new(Arc::clone(&store))))
            .change_feed(Arc::new(tessera::StoreChangeFeed::new(Arc::clone(&store))))
            .index(index)
            .build()
            .unwrap();

        let merged = read(&tessera, ConsistencyLevel::Hybrid);
        let truth = read(&transactional, ConsistencyLevel::Transactional);

        prop_assert_eq!(ids(&merged), ids(&truth));
        prop_assert_eq!(merged.len(), ids(&merged).len());
        prop_assert_eq!(merged.total_found(), merged.len() as u64);
    }
}
