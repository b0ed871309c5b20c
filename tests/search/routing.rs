//! Routing Tests
//!
//! Which executors a request reaches at each consistency level.

use crate::common::*;
use tessera::Strategy;

fn with_both(db: Arc<MockDb>, index: Arc<MockIndex>) -> Tessera {
    Tessera::builder().db(db).index(index).build().unwrap()
}

// ============================================================================
// Single-backend levels
// ============================================================================

#[test]
fn eventual_goes_to_index_only() {
    init_tracing();
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = with_both(db.clone(), index.clone());

    let set = tessera
        .search(&SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Eventual))
        .unwrap();

    assert_eq!(refs(&set), ["idx"]);
    assert_eq!(index.calls(), 1);
    assert_eq!(db.calls(), 0);
}

#[test]
fn transactional_goes_to_db_only() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = with_both(db.clone(), index.clone());

    let req = SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Transactional);
    let set = tessera.search(&req).unwrap();

    assert_eq!(refs(&set), ["db"]);
    assert_eq!(db.calls(), 1);
    assert_eq!(index.calls(), 0);
}

#[test]
fn eventual_without_index_is_unavailable() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let tessera = Tessera::builder().db(db.clone()).build().unwrap();

    let err = tessera
        .search(&SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Eventual))
        .unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(db.calls(), 0);
}

#[test]
fn transactional_without_db_is_unavailable() {
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = Tessera::builder().index(index.clone()).build().unwrap();

    let req = SearchRequest::new("TEXT:x").with_consistency(ConsistencyLevel::Transactional);
    let err = tessera.search(&req).unwrap_err();

    assert!(matches!(
        err,
        Error::QueryUnavailable {
            consistency: ConsistencyLevel::Transactional,
            ..
        }
    ));
    assert_eq!(index.calls(), 0);
}

// ============================================================================
// Opportunistic levels
// ============================================================================

#[test]
fn default_prefers_db_when_it_answers() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = with_both(db.clone(), index.clone());

    let set = tessera.search(&SearchRequest::new("TEXT:x")).unwrap();

    assert_eq!(refs(&set), ["db"]);
    assert_eq!(index.calls(), 0);
}

#[test]
fn default_strategy_follows_availability() {
    let db = MockDb::answering(Ok(ResultSet::empty()));
    let index = MockIndex::answering(Ok(ResultSet::empty()));

    let cases = [
        (Tessera::builder().db(db.clone()).index(index.clone()), Strategy::Opportunistic),
        (Tessera::builder().db(db.clone()), Strategy::DbOnly),
        (Tessera::builder().index(index.clone()), Strategy::IndexOnly),
    ];
    for (builder, expected) in cases {
        let tessera = builder.build().unwrap();
        for level in [ConsistencyLevel::Default, ConsistencyLevel::TransactionalIfPossible] {
            assert_eq!(tessera.strategy_for(level).unwrap(), expected);
        }
    }

    let bare = Tessera::builder().build().unwrap();
    assert!(bare.strategy_for(ConsistencyLevel::Default).unwrap_err().is_unavailable());
}

// ============================================================================
// Request validation
// ============================================================================

#[test]
fn cancelled_request_reaches_no_backend() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = with_both(db.clone(), index.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = tessera
        .search(&SearchRequest::new("TEXT:x").with_cancellation(cancel))
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(db.calls() + index.calls(), 0);
}

#[test]
fn caller_supplied_delta_bound_is_rejected() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let tessera = Tessera::builder().db(db.clone()).build().unwrap();

    let req = SearchRequest::new("TEXT:x").delta_from(TxnId::new(3));
    let err = tessera.search(&req).unwrap_err();

    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(db.calls(), 0);
}

#[test]
fn request_without_stores_is_rejected_at_every_level() {
    let db = MockDb::answering(Ok(result_set(&["db"])));
    let index = MockIndex::answering(Ok(result_set(&["idx"])));
    let tessera = with_both(db.clone(), index.clone());

    for level in [
        ConsistencyLevel::Eventual,
        ConsistencyLevel::Transactional,
        ConsistencyLevel::TransactionalIfPossible,
    ] {
        let mut req = SearchRequest::new("TEXT:x").with_consistency(level);
        req.context.stores.clear();
        let err = tessera.search(&req).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
    assert_eq!(db.calls() + index.calls(), 0);
}
