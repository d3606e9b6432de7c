//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate record operations into SQL against a given unit-of-work.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths require an active transaction; the repository never opens,
//!   commits or rolls one back itself.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Constraint rejections surface as [`RepoError::Integrity`] so the
//!   service can recover the transaction without masking the error.

use crate::db::{DbError, DbResult, UnitOfWork};
use crate::model::record::{PendingRecord, Record, RecordId};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT id, task, done, created_at_ms FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Infrastructure failure (connection, transaction lifecycle, SQL).
    Db(DbError),
    /// Store-enforced constraint rejection on write; carries the store's
    /// message since no richer error code is assumed to exist.
    Integrity(String),
    /// A row that is contractually required was not there.
    NotFound(RecordId),
    /// Persisted state that violates the model's invariants.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Integrity(message) => write!(f, "integrity violation: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Integrity(_) => None,
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match constraint_message(&value) {
            Some(message) => Self::Integrity(message),
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if let DbError::Sqlite(err) = &value {
            if let Some(message) = constraint_message(err) {
                return Self::Integrity(message);
            }
        }
        Self::Db(value)
    }
}

fn constraint_message(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(inner, message)
            if inner.code == ErrorCode::ConstraintViolation =>
        {
            Some(message.clone().unwrap_or_else(|| inner.to_string()))
        }
        _ => None,
    }
}

/// Repository interface for record operations against one unit-of-work.
pub trait RecordRepository {
    /// Registers a new record as pending inside the active transaction.
    /// Does not commit; server-assigned fields stay unobservable.
    fn add(&self, text: &str) -> RepoResult<PendingRecord>;

    /// Point lookup by primary key; absence is `Ok(None)`.
    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<Record>>;

    /// All records ordered by `id` descending, freshly materialized.
    fn list_descending(&self) -> RepoResult<Vec<Record>>;

    /// Re-reads a pending record so store-assigned fields become visible.
    /// Only meaningful after the unit-of-work committed.
    fn refresh(&self, pending: &PendingRecord) -> RepoResult<Record>;
}

/// SQLite-backed record repository bound to a borrowed unit-of-work.
pub struct SqliteRecordRepository<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> SqliteRecordRepository<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }

    fn conn(&self) -> DbResult<&Connection> {
        self.uow.connection()
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn add(&self, text: &str) -> RepoResult<PendingRecord> {
        if !self.uow.is_active() {
            return Err(RepoError::Db(DbError::TransactionClosed {
                operation: "add",
            }));
        }

        let conn = self.conn()?;
        // `done` and `created_at_ms` are store defaults; inserting them here
        // would make the core, not the store, authoritative.
        conn.execute("INSERT INTO records (task) VALUES (?1);", params![text])?;

        Ok(PendingRecord {
            rowid: conn.last_insert_rowid(),
            text: text.to_string(),
        })
    }

    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_descending(&self) -> RepoResult<Vec<Record>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id DESC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn refresh(&self, pending: &PendingRecord) -> RepoResult<Record> {
        match self.get_by_id(pending.rowid)? {
            Some(record) => Ok(record),
            None => Err(RepoError::NotFound(pending.rowid)),
        }
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in records.done"
            )));
        }
    };

    Ok(Record {
        id: row.get("id")?,
        text: row.get("task")?,
        done,
        created_at_ms: row.get("created_at_ms")?,
    })
}
