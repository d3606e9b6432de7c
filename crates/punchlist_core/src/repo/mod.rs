//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define store-agnostic data access contracts over one unit-of-work.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories hold no transaction authority: they never commit, never
//!   roll back and never catch persistence errors.
//! - Point-lookup absence is `Ok(None)`, never an error; `NotFound` is
//!   reserved for operations where the row is contractually required.

pub mod record_repo;
