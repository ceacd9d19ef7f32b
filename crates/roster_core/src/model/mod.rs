//! Validated domain entities.
//!
//! # Responsibility
//! - Define departments, employees and reviews with private, validated fields.
//! - Define the lookup seam used for referential checks between entities.
//!
//! # Invariants
//! - No field is ever observable in an invalid state: validators run before
//!   a value is stored and a failed assignment keeps the old value.
//! - Entities are shared through `Rc`, so setters take `&self` and mutate
//!   through per-field cells. Getters hand out copies, never borrows.

pub mod department;
pub mod employee;
pub mod review;
pub mod validation;

/// Storage-assigned row identity (SQLite rowid).
pub type RecordId = i64;
