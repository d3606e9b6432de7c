//! Domain model for persisted records.
//!
//! # Responsibility
//! - Define the canonical record shape the boundary serializes.
//! - Distinguish durable records from pending, not-yet-committed ones.
//!
//! # Invariants
//! - Every durable record is identified by a stable, store-assigned
//!   `RecordId`.
//! - Server-assigned fields are only observable on hydrated records.

pub mod record;
