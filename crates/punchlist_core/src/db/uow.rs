//! Per-request unit-of-work guard.
//!
//! # Responsibility
//! - Own one pooled connection and one transaction scope for one request.
//! - Expose explicit, single-shot commit/rollback.
//! - Guarantee exactly-once release on every exit path via `Drop`.
//!
//! # Invariants
//! - The transaction begins when the scope is acquired and finishes at most
//!   once; a second commit/rollback is a `DbError::TransactionClosed`.
//! - After a successful commit the connection stays usable for autocommit
//!   reads (hydration) until the guard is dropped.
//! - Dropping an unfinished scope rolls the transaction back before the
//!   connection is returned to the pool, so aborted requests never publish
//!   partial writes.

use super::pool::PoolInner;
use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::cell::Cell;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// One logical transaction scope bound to one request.
///
/// Exclusive by construction: the guard is handed to exactly one
/// repository/service pair and release consumes ownership, so use after
/// release is unrepresentable.
pub struct UnitOfWork {
    conn: Option<Connection>,
    state: Cell<TxState>,
    pool: Arc<PoolInner>,
    id: Uuid,
}

impl UnitOfWork {
    pub(crate) fn begin(conn: Connection, pool: Arc<PoolInner>) -> DbResult<Self> {
        conn.execute_batch("BEGIN DEFERRED;")?;
        Ok(Self {
            conn: Some(conn),
            state: Cell::new(TxState::Active),
            pool,
            id: Uuid::new_v4(),
        })
    }

    /// Correlation id carried through `uow_*` log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the transaction scope is still open for writes.
    pub fn is_active(&self) -> bool {
        self.state.get() == TxState::Active
    }

    /// Borrow of the underlying connection for repositories bound to this
    /// scope. Reads remain valid after commit; writes require an active
    /// transaction.
    pub(crate) fn connection(&self) -> DbResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or(DbError::TransactionClosed { operation: "access" })
    }

    /// Makes all pending writes durable. Single-shot.
    pub fn commit(&self) -> DbResult<()> {
        self.finish("commit", "COMMIT;", TxState::Committed)
    }

    /// Undoes all pending writes. Single-shot.
    pub fn rollback(&self) -> DbResult<()> {
        self.finish("rollback", "ROLLBACK;", TxState::RolledBack)
    }

    fn finish(&self, operation: &'static str, sql: &str, next: TxState) -> DbResult<()> {
        if self.state.get() != TxState::Active {
            return Err(DbError::TransactionClosed { operation });
        }
        self.connection()?.execute_batch(sql)?;
        self.state.set(next);
        info!(
            "event=uow_{operation} module=db status=ok uow_id={}",
            self.id
        );
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        if self.state.get() == TxState::Active {
            // Abandoned scope (error path or aborted request): undo pending
            // writes before the connection can be reused.
            if let Err(err) = conn.execute_batch("ROLLBACK;") {
                warn!(
                    "event=uow_release module=db status=error uow_id={} error_code=rollback_failed error={err}",
                    self.id
                );
                // Connection state is suspect; close it instead of pooling.
                return;
            }
        }

        info!("event=uow_release module=db status=ok uow_id={}", self.id);
        self.pool.restore(conn);
    }
}
