//! In-memory collection store for tests and single-node development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::catalog::{CatalogError, Collection, CollectionStats, StatsDelta};
use crate::domain::foundation::{CollectionId, StoreError};
use crate::ports::CollectionStore;

/// In-memory [`CollectionStore`].
///
/// The counter delta is computed and committed under one write lock
/// acquisition; readers either see the counters before the delta or
/// after it, never in between.
#[derive(Debug, Default)]
pub struct InMemoryCollectionStore {
    collections: RwLock<HashMap<CollectionId, Collection>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn create(&self, collection: Collection) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(&collection.id) {
            return Err(StoreError::AlreadyExists);
        }
        collections.insert(collection.id, collection);
        Ok(())
    }

    async fn get(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError> {
        Ok(self.collections.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Collection>, StoreError> {
        let mut all: Vec<Collection> = self.collections.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn apply_delta(
        &self,
        id: &CollectionId,
        delta: StatsDelta,
    ) -> Result<CollectionStats, CatalogError> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(id)
            .ok_or(CatalogError::CollectionNotFound(*id))?;
        let next = collection
            .stats
            .apply(delta)
            .map_err(|violation| CatalogError::AggregateInvariant {
                collection: *id,
                violation,
            })?;
        collection.stats = next;
        Ok(next)
    }
}
