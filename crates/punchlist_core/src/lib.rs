//! Transactional data-access core for the punchlist record service.
//! This crate is the single source of truth for transaction invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resolver;
pub mod service;

pub use db::{ConnectionPool, DbError, DbResult, UnitOfWork};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{PendingRecord, Record, RecordId};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use resolver::{record_service, with_record_service, SqliteRecordService};
pub use service::record_service::RecordService;

/// Minimal health-check API for boundary probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
