//! Importable record contract.

use super::EntityId;

/// Record that can go through batch import with conflict detection.
///
/// Implementors spell out business equality field by field; storage identity
/// and timestamps are never part of it.
pub trait Importable {
    /// Storage identity, `0` before persistence.
    fn id(&self) -> EntityId;

    /// Business code used as natural dedup key.
    fn code(&self) -> &str;

    /// Returns whether all business fields (code included) match `other`.
    fn same_business_fields(&self, other: &Self) -> bool;
}
