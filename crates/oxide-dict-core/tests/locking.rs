mod common;

use std::sync::Arc;

use common::{LockState, RecordingDialect, StubPlanner};
use oxide_dict_core::{
    CapabilityLookup, Db2Dialect, DerbyDialect, Dialect, GenericDialect, LockConflict,
    LockRequest, SqliteDialect,
};

#[test]
fn db2_refuses_locking_with_outer_join() {
    let dialect = RecordingDialect::new(Arc::new(Db2Dialect::new()));
    assert!(!dialect
        .capabilities()
        .flag("supportsLockingWithOuterJoin")
        .unwrap());

    let planner = StubPlanner::new(&dialect);
    let request = LockRequest {
        outer_join: true,
        ..LockRequest::default()
    };
    let (state, tail) = planner.plan(true, &request);

    assert_eq!(state, LockState::RowLockRejected(vec![LockConflict::OuterJoin]));
    assert!(tail.is_empty());
    assert_eq!(dialect.lock_clause_calls(), 0);
}

#[test]
fn db2_locks_simple_selects_with_repeatable_read() {
    let dialect = RecordingDialect::new(Arc::new(Db2Dialect::new()));
    let planner = StubPlanner::new(&dialect);

    let (state, tail) = planner.plan(true, &LockRequest::default());
    assert_eq!(state, LockState::RowLockRequested);
    assert_eq!(tail, "FOR UPDATE WITH RR");

    let paged = LockRequest {
        select_range: true,
        ..LockRequest::default()
    };
    assert_eq!(planner.plan(true, &paged).0, LockState::RowLockRequested);
    assert_eq!(dialect.lock_clause_calls(), 2);
}

#[test]
fn no_lock_never_consults_the_dialect() {
    let dialect = RecordingDialect::new(Arc::new(DerbyDialect::new()));
    let request = LockRequest {
        distinct: true,
        order_by: true,
        ..LockRequest::default()
    };
    let (state, _) = StubPlanner::new(&dialect).plan(false, &request);
    assert_eq!(state, LockState::NoLock);
    assert_eq!(dialect.lock_clause_calls(), 0);
}

#[test]
fn every_conflict_is_reported() {
    let request = LockRequest {
        distinct: true,
        multiple_tables: true,
        order_by: true,
        outer_join: true,
        inner_join: true,
        select_range: true,
    };
    assert_eq!(
        Db2Dialect::new().capabilities().locking_conflicts(&request),
        vec![
            LockConflict::Distinct,
            LockConflict::MultipleTables,
            LockConflict::OrderBy,
            LockConflict::OuterJoin,
            LockConflict::InnerJoin,
        ]
    );
    assert!(GenericDialect::new()
        .capabilities()
        .locking_conflicts(&request)
        .is_empty());
}

#[test]
fn sqlite_rejects_every_lock() {
    let dialect = RecordingDialect::new(Arc::new(SqliteDialect::new()));
    let (state, _) = StubPlanner::new(&dialect).plan(true, &LockRequest::default());
    assert_eq!(
        state,
        LockState::RowLockRejected(vec![LockConflict::SelectForUpdate])
    );
    assert_eq!(dialect.lock_clause_calls(), 0);
}
