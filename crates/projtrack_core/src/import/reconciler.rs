use super::{ImportOutcome, ImportStore};
use crate::model::importable::Importable;
use crate::model::EntityId;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type ImportResult<T> = Result<T, ImportError>;

/// Failures that are not business rejections.
#[derive(Debug)]
pub enum ImportError {
    /// Caller passed no batch at all; carries the parameter name.
    InvalidArgument(&'static str),
    /// Store refused a batch that had already passed reconciliation.
    /// Carries the store message verbatim.
    InvariantViolation(String),
    /// Store transport/read failure.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(name) => write!(f, "invalid argument: `{name}` is required"),
            Self::InvariantViolation(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Diffs an incoming batch against the persisted set and imports only when
/// no business code collides.
///
/// `F` decides whether two records with the same code are duplicates. It
/// defaults to [`Importable::same_business_fields`].
pub struct ImportReconciler<T, S, F = fn(&T, &T) -> bool> {
    store: S,
    same_fields: F,
    _entity: PhantomData<fn(&T)>,
}

impl<T: Importable + Clone, S: ImportStore<T>> ImportReconciler<T, S> {
    pub fn new(store: S) -> Self {
        Self::with_comparator(store, T::same_business_fields)
    }
}

impl<T, S, F> ImportReconciler<T, S, F>
where
    T: Importable + Clone,
    S: ImportStore<T>,
    F: Fn(&T, &T) -> bool,
{
    /// Builds a reconciler with a custom duplicate predicate.
    pub fn with_comparator(store: S, same_fields: F) -> Self {
        Self {
            store,
            same_fields,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Imports the records of `batch` that are not yet persisted.
    ///
    /// # Contract
    /// - `None` fails with [`ImportError::InvalidArgument`] before any store call.
    /// - Empty batch returns `BadRequest` before any store call.
    /// - All candidates already persisted returns `Ok` / "already imported", no write.
    /// - Any code collision with differing fields returns `Conflict` with the
    ///   colliding existing ids, no write.
    /// - One code carried twice by the batch with differing fields returns
    ///   `BadRequest`, no write.
    /// - Otherwise the new records are written in one bulk call; a non-`Ok`
    ///   store answer becomes [`ImportError::InvariantViolation`].
    pub fn import(&self, batch: Option<&[T]>) -> ImportResult<ImportOutcome> {
        let Some(batch) = batch else {
            warn!("event=import_reconcile module=import status=error error_code=missing_batch");
            return Err(ImportError::InvalidArgument("batch"));
        };
        if batch.is_empty() {
            info!("event=import_reconcile module=import status=bad_request reason=empty_batch");
            return Ok(ImportOutcome::empty_batch());
        }

        let existing = self.store.get_all()?;
        let remaining = self.new_candidates(batch, &existing);
        if remaining.is_empty() {
            info!(
                "event=import_reconcile module=import status=ok reason=already_imported batch={}",
                batch.len()
            );
            return Ok(ImportOutcome::already_imported());
        }

        let conflict_ids = self.conflicting_ids(&existing, &remaining);
        if !conflict_ids.is_empty() {
            info!(
                "event=import_reconcile module=import status=conflict batch={} conflicts={}",
                batch.len(),
                conflict_ids.len()
            );
            return Ok(ImportOutcome::conflicts(&conflict_ids));
        }

        if let Some(code) = repeated_code(&remaining) {
            info!(
                "event=import_reconcile module=import status=bad_request reason=repeated_code batch={}",
                batch.len()
            );
            return Ok(ImportOutcome::repeated_code(code));
        }

        let to_write: Vec<T> = remaining.into_iter().cloned().collect();
        let outcome = self.store.import(&to_write)?;
        if !outcome.is_ok() {
            error!(
                "event=import_reconcile module=import status=error error_code=store_rejected http={}",
                outcome.status.http_code()
            );
            return Err(ImportError::InvariantViolation(outcome.message));
        }

        info!(
            "event=import_reconcile module=import status=ok batch={} count={}",
            batch.len(),
            outcome.count
        );
        Ok(outcome)
    }

    /// Drops candidates that duplicate a persisted record or an earlier
    /// candidate; input order is kept.
    fn new_candidates<'a>(&self, batch: &'a [T], existing: &[T]) -> Vec<&'a T> {
        let mut remaining: Vec<&'a T> = Vec::with_capacity(batch.len());
        for candidate in batch {
            let seen = existing
                .iter()
                .chain(remaining.iter().copied())
                .any(|other| self.is_duplicate(other, candidate));
            if !seen {
                remaining.push(candidate);
            }
        }
        remaining
    }

    /// Ids of persisted records whose code is reused by a differing candidate,
    /// in persisted-set order.
    fn conflicting_ids(&self, existing: &[T], remaining: &[&T]) -> Vec<EntityId> {
        existing
            .iter()
            .filter(|stored| {
                remaining.iter().any(|candidate| {
                    stored.code() == candidate.code() && !(self.same_fields)(*stored, *candidate)
                })
            })
            .map(Importable::id)
            .collect()
    }

    fn is_duplicate(&self, left: &T, right: &T) -> bool {
        left.code() == right.code() && (self.same_fields)(left, right)
    }
}

/// First code shared by two candidates. Exact duplicates are already
/// collapsed, so any repeat here has differing fields.
fn repeated_code<'a, T: Importable>(remaining: &[&'a T]) -> Option<&'a str> {
    let mut seen = HashSet::new();
    remaining
        .iter()
        .copied()
        .map(Importable::code)
        .find(|code| !seen.insert(*code))
}
