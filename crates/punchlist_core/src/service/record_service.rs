//! Record use-case service.
//!
//! # Responsibility
//! - Define the transaction boundary for every mutating operation.
//! - Recover transaction state on integrity violations without masking
//!   the error.
//! - Hydrate store-assigned fields before returning created records.
//!
//! # Invariants
//! - Every mutating method follows delegate -> commit -> refresh; reads
//!   pass straight through and never commit.
//! - The repository must be bound to the same unit-of-work the service
//!   holds; the resolver factory is the supported way to build the pair.

use crate::db::UnitOfWork;
use crate::model::record::{PendingRecord, Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use log::{info, warn};

/// Use-case service owning commit/rollback for record operations.
pub struct RecordService<'uow, R: RecordRepository> {
    uow: &'uow UnitOfWork,
    repo: R,
}

impl<'uow, R: RecordRepository> RecordService<'uow, R> {
    /// Creates a service over a repository bound to the same unit-of-work.
    pub fn new(uow: &'uow UnitOfWork, repo: R) -> Self {
        Self { uow, repo }
    }

    /// Creates a record and returns it fully hydrated.
    ///
    /// Protocol: register the pending record, commit the unit-of-work,
    /// re-read the row so `id` and `createdAt` reflect store-assigned
    /// values. On an integrity violation the transaction is rolled back and
    /// the violation is re-signalled unchanged; any other failure
    /// propagates without local recovery (the scope's drop rolls back).
    ///
    /// Input contract: `text` is already boundary-validated (1–255 chars);
    /// the core does not re-validate.
    pub fn create(&self, text: &str) -> RepoResult<Record> {
        let pending = match self.add_and_commit(text) {
            Ok(pending) => pending,
            Err(err) => return Err(self.recover_transaction(err)),
        };

        let record = self.repo.refresh(&pending)?;
        info!(
            "event=record_create module=service status=ok uow_id={} record_id={}",
            self.uow.id(),
            record.id
        );
        Ok(record)
    }

    /// Point lookup; pure read, never commits.
    pub fn get(&self, id: RecordId) -> RepoResult<Option<Record>> {
        self.repo.get_by_id(id)
    }

    /// All records newest-first; pure read, never commits.
    pub fn list(&self) -> RepoResult<Vec<Record>> {
        self.repo.list_descending()
    }

    fn add_and_commit(&self, text: &str) -> RepoResult<PendingRecord> {
        let pending = self.repo.add(text)?;
        self.uow.commit()?;
        Ok(pending)
    }

    /// Rolls the unit-of-work back on integrity violations so the scope is
    /// clean again, then hands the original error back unchanged.
    fn recover_transaction(&self, err: RepoError) -> RepoError {
        if matches!(err, RepoError::Integrity(_)) {
            warn!(
                "event=record_create module=service status=conflict uow_id={} error={err}",
                self.uow.id()
            );
            if let Err(rollback_err) = self.uow.rollback() {
                warn!(
                    "event=uow_rollback module=service status=error uow_id={} error={rollback_err}",
                    self.uow.id()
                );
            }
        }
        err
    }
}
