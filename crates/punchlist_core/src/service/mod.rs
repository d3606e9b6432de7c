//! Core use-case services.
//!
//! # Responsibility
//! - Own transaction boundaries: commit, rollback-on-conflict, hydration.
//! - Keep boundary layers decoupled from storage details.

pub mod record_service;
