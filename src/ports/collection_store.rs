//! Collection store port - collection documents and their counters.

use async_trait::async_trait;

use crate::domain::catalog::{CatalogError, Collection, CollectionStats, StatsDelta};
use crate::domain::foundation::{CollectionId, StoreError};

/// Port for collection persistence.
///
/// `apply_delta` is the only way the counters move, and implementations
/// must commit both fields as one atomic update - a reader must never
/// observe the total moved but not the premium count (or vice versa).
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Inserts a new collection.
    async fn create(&self, collection: Collection) -> Result<(), StoreError>;

    /// Fetches a collection by id.
    async fn get(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError>;

    /// Lists all collections, newest first.
    async fn list(&self) -> Result<Vec<Collection>, StoreError>;

    /// Applies a combined counter delta atomically, returning the new
    /// counters.
    ///
    /// # Errors
    ///
    /// - `CatalogError::CollectionNotFound` for an unknown collection
    /// - `CatalogError::AggregateInvariant` if the delta would corrupt
    ///   the counters; nothing is committed in that case
    async fn apply_delta(
        &self,
        id: &CollectionId,
        delta: StatsDelta,
    ) -> Result<CollectionStats, CatalogError>;
}
