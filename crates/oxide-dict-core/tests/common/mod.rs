#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use oxide_dict_core::{
    Capabilities, Dialect, FilterValue, IsolationLevel, LockConflict, LockRequest, Operation,
    SqlBuffer,
};

pub fn col(name: &str) -> FilterValue {
    match name.split_once('.') {
        Some((table, column)) => FilterValue::qualified(table, column),
        None => FilterValue::column(name),
    }
}

pub fn int(n: i64) -> FilterValue {
    FilterValue::literal(n)
}

pub fn text(s: &str) -> FilterValue {
    FilterValue::literal(s)
}

pub fn param_int(n: i64) -> FilterValue {
    FilterValue::param(n)
}

pub fn param_text(s: &str) -> FilterValue {
    FilterValue::param(s)
}

pub fn render(dialect: &dyn Dialect, op: Operation, operands: &[FilterValue]) -> SqlBuffer {
    let mut buf = SqlBuffer::new();
    dialect
        .generate(op, operands, &mut buf)
        .unwrap_or_else(|e| panic!("{op} failed on {}: {e}", dialect.name()));
    buf
}

/// Wraps a dialect and counts calls to the locking-clause generator.
#[derive(Debug)]
pub struct RecordingDialect {
    inner: Arc<dyn Dialect>,
    lock_clause_calls: AtomicUsize,
}

impl RecordingDialect {
    pub fn new(inner: Arc<dyn Dialect>) -> Self {
        Self {
            inner,
            lock_clause_calls: AtomicUsize::new(0),
        }
    }

    pub fn lock_clause_calls(&self) -> usize {
        self.lock_clause_calls.load(Ordering::SeqCst)
    }
}

impl Dialect for RecordingDialect {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn capabilities(&self) -> &Capabilities {
        self.inner.capabilities()
    }

    fn generate(
        &self,
        operation: Operation,
        operands: &[FilterValue],
        buf: &mut SqlBuffer,
    ) -> oxide_dict_core::Result<()> {
        self.inner.generate(operation, operands, buf)
    }

    fn for_update_clause(&self, isolation: Option<IsolationLevel>) -> Option<&str> {
        self.lock_clause_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.for_update_clause(isolation)
    }
}

/// Where a planned SELECT ended up with respect to row locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    NoLock,
    RowLockRequested,
    RowLockRejected(Vec<LockConflict>),
}

/// Minimal stand-in for a query planner deciding whether a SELECT may
/// carry a row-locking clause.
pub struct StubPlanner<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> StubPlanner<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Plans `SELECT ... FROM base` with an optional lock, returning the
    /// final lock state and the SQL tail.
    pub fn plan(&self, lock: bool, request: &LockRequest) -> (LockState, String) {
        if !lock {
            return (LockState::NoLock, String::new());
        }
        let conflicts = self.dialect.capabilities().locking_conflicts(request);
        if !conflicts.is_empty() {
            // Degrade to an unlocked read.
            return (LockState::RowLockRejected(conflicts), String::new());
        }
        match self
            .dialect
            .for_update_clause(Some(IsolationLevel::ReadCommitted))
        {
            Some(clause) => (LockState::RowLockRequested, String::from(clause)),
            None => (
                LockState::RowLockRejected(vec![LockConflict::SelectForUpdate]),
                String::new(),
            ),
        }
    }
}
