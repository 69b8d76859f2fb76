//! Batch import with conflict detection.
//!
//! # Responsibility
//! - Define the import outcome envelope shared by stores and services.
//! - Define the store contract (`get_all` + bulk `import`).
//! - Reconcile an incoming batch against persisted records by business code.
//!
//! # Invariants
//! - A batch with any code conflict is rejected whole; nothing is written.
//! - The store is called with at most one bulk write per import request.

mod outcome;
mod reconciler;

pub use outcome::{
    ImportOutcome, ImportStatus, ALREADY_IMPORTED_MESSAGE, EMPTY_BATCH_MESSAGE, IMPORTED_MESSAGE,
};
pub use reconciler::{ImportError, ImportReconciler, ImportResult};

use crate::repo::RepoResult;

/// Persistence contract consumed by [`ImportReconciler`].
pub trait ImportStore<T> {
    /// Returns the complete current set of persisted records.
    fn get_all(&self) -> RepoResult<Vec<T>>;

    /// Persists exactly `entities` in one bulk operation.
    fn import(&self, entities: &[T]) -> RepoResult<ImportOutcome>;
}

impl<T, S: ImportStore<T> + ?Sized> ImportStore<T> for &S {
    fn get_all(&self) -> RepoResult<Vec<T>> {
        (**self).get_all()
    }

    fn import(&self, entities: &[T]) -> RepoResult<ImportOutcome> {
        (**self).import(entities)
    }
}
