//! RemoveItemHandler - content deletion with counter maintenance.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ContentItem, StatsDelta};
use crate::domain::foundation::{ContentId, StoreError};
use crate::ports::{CollectionStore, ContentRepository};

/// Command to remove a content item.
#[derive(Debug, Clone)]
pub struct RemoveItemCommand {
    pub content_id: ContentId,
}

/// Handler for item removal.
///
/// The deleted item's own premium flag drives the negated counter pair,
/// applied as one combined delta - observers see the old counters or the
/// new ones, never a half-applied pair.
pub struct RemoveItemHandler {
    content: Arc<dyn ContentRepository>,
    collections: Arc<dyn CollectionStore>,
}

impl RemoveItemHandler {
    pub fn new(content: Arc<dyn ContentRepository>, collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            content,
            collections,
        }
    }

    pub async fn handle(&self, cmd: RemoveItemCommand) -> Result<ContentItem, CatalogError> {
        let item = match self.content.delete(&cmd.content_id).await {
            Ok(item) => item,
            Err(StoreError::NotFound) => return Err(CatalogError::ItemNotFound(cmd.content_id)),
            Err(err) => return Err(err.into()),
        };

        self.collections
            .apply_delta(&item.collection_id, StatsDelta::remove(item.premium))
            .await?;

        Ok(item)
    }
}
