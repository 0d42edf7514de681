//! Collection management - creation and listing.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Collection};
use crate::ports::CollectionStore;

/// Command to create a collection.
#[derive(Debug, Clone)]
pub struct CreateCollectionCommand {
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
}

/// Handler for collection creation.
pub struct CreateCollectionHandler {
    collections: Arc<dyn CollectionStore>,
}

impl CreateCollectionHandler {
    pub fn new(collections: Arc<dyn CollectionStore>) -> Self {
        Self { collections }
    }

    pub async fn handle(&self, cmd: CreateCollectionCommand) -> Result<Collection, CatalogError> {
        let collection =
            Collection::create(cmd.name, cmd.description, cmd.thumbnail_url, cmd.tags)?;
        self.collections.create(collection.clone()).await?;
        Ok(collection)
    }
}

/// Handler for listing collections with their counters.
pub struct ListCollectionsHandler {
    collections: Arc<dyn CollectionStore>,
}

impl ListCollectionsHandler {
    pub fn new(collections: Arc<dyn CollectionStore>) -> Self {
        Self { collections }
    }

    pub async fn handle(&self) -> Result<Vec<Collection>, CatalogError> {
        Ok(self.collections.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCollectionStore;

    #[tokio::test]
    async fn create_then_list() {
        let store = Arc::new(InMemoryCollectionStore::new());
        let create = CreateCollectionHandler::new(store.clone());
        let list = ListCollectionsHandler::new(store);

        create
            .handle(CreateCollectionCommand {
                name: "Aurora".into(),
                description: "Night skies".into(),
                thumbnail_url: "s3://t".into(),
                tags: vec!["night".into()],
            })
            .await
            .unwrap();

        let all = list.handle().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Aurora");
        assert_eq!(all[0].stats.total, 0);
    }

    #[tokio::test]
    async fn invalid_collection_is_rejected() {
        let store = Arc::new(InMemoryCollectionStore::new());
        let create = CreateCollectionHandler::new(store);

        let result = create
            .handle(CreateCollectionCommand {
                name: String::new(),
                description: "d".into(),
                thumbnail_url: "s3://t".into(),
                tags: vec![],
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }
}
