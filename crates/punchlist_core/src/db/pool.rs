//! Connection pool: the unit-of-work provider.
//!
//! # Responsibility
//! - Keep a bounded set of idle, fully bootstrapped connections.
//! - Hand out one [`UnitOfWork`] per request via [`ConnectionPool::acquire`].
//! - Take released connections back for reuse.
//!
//! # Invariants
//! - Every connection entering the idle set has pragmas and migrations
//!   applied (it only ever comes from `open_target`).
//! - The idle set is the only cross-request shared mutable state in core.
//! - In-memory pools keep an anchor connection alive so the shared-cache
//!   database survives even when no request is in flight.

use super::open::{open_target, OpenTarget};
use super::uow::UnitOfWork;
use super::DbResult;
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const DEFAULT_MAX_IDLE: usize = 4;

/// Shared pool state; unit-of-work guards hold an `Arc` to it so release
/// works from whichever thread drops the guard.
pub(crate) struct PoolInner {
    target: OpenTarget,
    idle: Mutex<Vec<Connection>>,
    max_idle: usize,
    _anchor: Option<Mutex<Connection>>,
}

impl PoolInner {
    fn idle_set(&self) -> MutexGuard<'_, Vec<Connection>> {
        // A poisoned lock only means another thread panicked mid-push; the
        // Vec itself is still structurally sound.
        match self.idle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns a released connection to the idle set, or closes it when the
    /// set is full. Called from `UnitOfWork::drop` on every exit path.
    pub(crate) fn restore(&self, conn: Connection) {
        let mut idle = self.idle_set();
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }
}

/// Provider of per-request transactional scopes over one SQLite database.
///
/// Cloning is cheap and shares the same underlying pool.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Opens a pool over a database file, bootstrapping the schema eagerly
    /// so migration failures surface here rather than on first acquire.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let target = OpenTarget::File(path.as_ref().to_path_buf());
        let first = open_target(&target)?;
        Self::build(target, first, None)
    }

    /// Opens a pool over a private shared-cache in-memory database.
    ///
    /// Intended for tests; the database disappears when the pool is dropped.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:punchlist-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let target = OpenTarget::MemoryUri(uri);
        let anchor = open_target(&target)?;
        let first = open_target(&target)?;
        Self::build(target, first, Some(anchor))
    }

    fn build(target: OpenTarget, first: Connection, anchor: Option<Connection>) -> DbResult<Self> {
        info!("event=pool_open module=db status=ok max_idle={DEFAULT_MAX_IDLE}");
        Ok(Self {
            inner: Arc::new(PoolInner {
                target,
                idle: Mutex::new(vec![first]),
                max_idle: DEFAULT_MAX_IDLE,
                _anchor: anchor.map(Mutex::new),
            }),
        })
    }

    /// Acquires a fresh unit-of-work bound to one pooled connection.
    ///
    /// Fallible and potentially slow: opening a connection or beginning the
    /// transaction can fail or wait on the store's busy timeout. The caller
    /// releases the scope by dropping it.
    pub fn acquire(&self) -> DbResult<UnitOfWork> {
        let reused = self.inner.idle_set().pop();
        let from_idle = reused.is_some();
        let conn = match reused {
            Some(conn) => conn,
            None => open_target(&self.inner.target)?,
        };

        let uow = UnitOfWork::begin(conn, Arc::clone(&self.inner))?;
        info!(
            "event=uow_acquire module=db status=ok uow_id={} reused={from_idle}",
            uow.id()
        );
        Ok(uow)
    }
}
