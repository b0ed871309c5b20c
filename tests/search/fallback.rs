//! Fallback Tests
//!
//! Opportunistic levels fall back to the index only when the transactional
//! store cannot express the query.

use crate::common::*;

fn model_error() -> tessera_core::Error {
    tessera_core::Error::query_model("disjunction is not supported")
}

#[test]
fn default_falls_back_on_query_model() {
    init_tracing();
    let db = MockDb::answering(Err(model_error()));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = Tessera::builder().db(db.clone()).index(index.clone()).build().unwrap();

    for level in [ConsistencyLevel::Default, ConsistencyLevel::TransactionalIfPossible] {
        let set = tessera
            .search(&SearchRequest::new("TEXT:a OR TEXT:b").with_consistency(level))
            .unwrap();
        assert_eq!(refs(&set), ["idx"]);
    }
    assert_eq!(db.calls(), 2);
    assert_eq!(index.calls(), 2);
}

#[test]
fn transactional_never_falls_back() {
    let db = MockDb::answering(Err(model_error()));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = Tessera::builder().db(db).index(index.clone()).build().unwrap();

    let err = tessera
        .search(&SearchRequest::new("q").with_consistency(ConsistencyLevel::Transactional))
        .unwrap_err();

    assert!(matches!(err, Error::QueryModel(_)));
    assert_eq!(index.calls(), 0);
}

#[test]
fn backend_failure_is_not_a_fallback_signal() {
    let db = MockDb::answering(Err(tessera_core::Error::backend_unavailable("db down")));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = Tessera::builder().db(db).index(index.clone()).build().unwrap();

    let err = tessera.search(&SearchRequest::new("q")).unwrap_err();

    assert!(err.is_transient());
    assert_eq!(index.calls(), 0);
}

#[test]
fn fallback_failure_surfaces_index_error() {
    let db = MockDb::answering(Err(model_error()));
    let index = MockIndex::answering(Err(tessera_core::Error::backend_unavailable("timeout")));
    let tessera = Tessera::builder().db(db).index(index).build().unwrap();

    let err = tessera.search(&SearchRequest::new("q")).unwrap_err();

    assert!(matches!(err, Error::BackendUnavailable(reason) if reason.contains("timeout")));
}

#[test]
fn default_without_index_reports_unavailable() {
    let db = MockDb::answering(Err(model_error()));
    let tessera = Tessera::builder().db(db).build().unwrap();

    let err = tessera.search(&SearchRequest::new("q")).unwrap_err();

    match err {
        Error::QueryUnavailable {
            consistency,
            reason,
        } => {
            assert_eq!(consistency, ConsistencyLevel::Default);
            assert!(reason.contains("disjunction"));
        }
        other => panic!("expected QueryUnavailable, got {:?}", other),
    }
}

#[test]
fn real_store_rejects_disjunction_and_index_answers() {
    let store = Arc::new(MemoryStore::new());
    store.put(Node::new("n1").with_text("budget")).unwrap();
    let index = MockIndex::answering(Ok(result_set(&["n1", "n2"])));
    let tessera = Tessera::builder()
        .db(Arc::new(tessera::StoreQueryExecutor::new(store)))
        .index(index.clone())
        .build()
        .unwrap();

    let set = tessera
        .search(&SearchRequest::new("TEXT:budget OR TEXT:holiday"))
        .unwrap();

    assert_eq!(refs(&set), ["n1", "n2"]);
    assert_eq!(index.calls(), 1);

    // Within the dialect the store answers itself
    let set = tessera.search(&SearchRequest::new("TEXT:budget")).unwrap();
    assert_eq!(refs(&set), ["n1"]);
    assert_eq!(index.calls(), 1);
}

#[test]
fn faceted_request_falls_back_with_facets_intact() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    store.put(Node::new("n1").with_text("budget")).unwrap();
    let body = serde_json::json!({
        "rows": [{ "entityRef": "n1", "score": 0.5 }],
        "numFound": 1,
        "facetCounts": { "cm:creator": [{ "value": "alice", "count": 1 }] },
    })
    .to_string();
    let transport = ScriptedTransport::replying(vec![Ok(HttpReply::ok(body))]);
    let tessera = tessera_over(store, transport.clone());

    let mut req = SearchRequest::new("TEXT:budget");
    req.context.facet_fields = vec!["cm:creator".to_string()];
    let set = tessera.search(&req).unwrap();

    assert_eq!(refs(&set), ["n1"]);
    assert_eq!(set.facets()["cm:creator"], vec![FacetCount::new("alice", 1)]);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let facet_fields: Vec<&str> = calls[0]
        .params
        .iter()
        .filter(|(k, _)| k == "facet.field")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(facet_fields, ["cm:creator"]);
    assert!(calls[0].params.contains(&("facet".to_string(), "true".to_string())));
}
