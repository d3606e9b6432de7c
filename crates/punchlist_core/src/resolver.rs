//! Per-request wiring of unit-of-work, repository and service.
//!
//! # Responsibility
//! - Compose one repository/service pair over one unit-of-work.
//! - Guarantee the unit-of-work is released exactly once when the request
//!   scope ends, on every exit path.
//!
//! This is the seam where the core meets the boundary layer: a handler
//! calls [`with_record_service`] with the work it wants performed and
//! never touches connection lifecycle itself.

use crate::db::{ConnectionPool, UnitOfWork};
use crate::repo::record_repo::{RepoResult, SqliteRecordRepository};
use crate::service::record_service::RecordService;

/// Concrete service composition used by boundary handlers.
pub type SqliteRecordService<'uow> = RecordService<'uow, SqliteRecordRepository<'uow>>;

/// Composes a repository and service over one borrowed unit-of-work.
///
/// The caller keeps ownership of the scope and with it the release
/// guarantee; prefer [`with_record_service`] unless the scope must outlive
/// a single closure.
pub fn record_service(uow: &UnitOfWork) -> SqliteRecordService<'_> {
    RecordService::new(uow, SqliteRecordRepository::new(uow))
}

/// Runs one request-scoped handler against a fresh service.
///
/// Acquires a unit-of-work from the pool, wires the service, invokes the
/// handler, then drops the scope: an uncommitted transaction is rolled
/// back and the connection returns to the pool whether the handler
/// succeeded, failed or panicked.
pub fn with_record_service<T, F>(pool: &ConnectionPool, handler: F) -> RepoResult<T>
where
    F: for<'uow> FnOnce(&SqliteRecordService<'uow>) -> RepoResult<T>,
{
    let uow = pool.acquire()?;
    let service = record_service(&uow);
    handler(&service)
}
