//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or shared-cache in-memory SQLite connections for the pool.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a bounded busy timeout.
//! - Returned connections have migrations fully applied.

use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a pooled connection points.
#[derive(Debug, Clone)]
pub(crate) enum OpenTarget {
    /// Database file on disk, opened in WAL mode.
    File(PathBuf),
    /// Shared-cache in-memory database addressed by a `file:` URI, so every
    /// pooled connection sees the same data.
    MemoryUri(String),
}

impl OpenTarget {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::MemoryUri(_) => "memory",
        }
    }
}

/// Opens a standalone SQLite database file with migrations applied.
///
/// Pool-less entry point for one-shot maintenance tooling; the service path
/// goes through [`crate::db::ConnectionPool`] instead.
pub fn open_connection(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(&OpenTarget::File(path.as_ref().to_path_buf()))
}

pub(crate) fn open_target(target: &OpenTarget) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match target {
        OpenTarget::File(path) => Connection::open(path),
        OpenTarget::MemoryUri(uri) => Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
    };

    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    if let Err(err) = bootstrap_connection(&mut conn, target) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection, target: &OpenTarget) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if matches!(target, OpenTarget::File(_)) {
        // WAL keeps readers unblocked while one writer commits; shared-cache
        // memory databases ignore the request, so only ask for files.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    }
    super::migrations::apply_migrations(conn)?;
    Ok(())
}
