//! Record domain model.
//!
//! # Invariants
//! - `id` and `created_at_ms` are store-assigned and immutable; they exist
//!   only on hydrated [`Record`] values, never on [`PendingRecord`].
//! - `text` is 1–255 characters; the boundary validates before the core and
//!   the store re-enforces it with a CHECK constraint.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier, monotonically increasing.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = i64;

/// A durable record as returned to callers after hydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned primary key.
    pub id: RecordId,
    /// Record body, 1–255 characters.
    pub text: String,
    /// Completion flag; the store defaults it to `false` at creation.
    pub done: bool,
    /// Creation time in epoch milliseconds, assigned by the store.
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
}

/// A record registered in a unit-of-work but not yet committed.
///
/// Carries the store's provisional row handle so the record can be
/// re-read (hydrated) once the transaction commits. Server-assigned
/// fields are deliberately not observable here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub(crate) rowid: i64,
    /// Record body as passed to `add`.
    pub text: String,
}

impl PendingRecord {
    /// Provisional row handle inside the still-open transaction.
    ///
    /// Only meaningful for hydration against the same unit-of-work; it is
    /// not a committed `RecordId` until the transaction commits.
    pub fn rowid(&self) -> i64 {
        self.rowid
    }
}
