//! Domain model for project tracking records.
//!
//! # Responsibility
//! - Define sub-project and task records shared by repositories and services.
//! - Define the importable contract (business code + business equality).
//!
//! # Invariants
//! - `id` is assigned by storage; `0` means the record is not persisted yet.
//! - `code` is the caller-meaningful natural key and is unique per table.
//! - Business equality never looks at `id` or `created_at`.

pub mod importable;
pub mod project;
pub mod sub_project;
pub mod task;
pub mod validation;

/// Storage-assigned identity shared by all tracked records.
pub type EntityId = i64;

/// Identity value carried by records that were never persisted.
pub const UNSAVED_ID: EntityId = 0;
