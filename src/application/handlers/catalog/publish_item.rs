//! PublishItemHandler - content creation with counter maintenance.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ContentItem, ContentKind, MediaRef, NewContentItem, StatsDelta};
use crate::domain::foundation::CollectionId;
use crate::ports::{CollectionStore, ContentRepository};

/// Command to publish a new content item into a collection.
#[derive(Debug, Clone)]
pub struct PublishItemCommand {
    pub collection_id: CollectionId,
    pub title: String,
    pub description: String,
    pub kind: ContentKind,
    pub premium: bool,
    pub media: MediaRef,
    pub tags: Vec<String>,
}

/// Handler for publishing items.
///
/// Inserts the item, then applies the combined `(+1, +premium)` counter
/// delta to the owning collection in one atomic step.
pub struct PublishItemHandler {
    content: Arc<dyn ContentRepository>,
    collections: Arc<dyn CollectionStore>,
}

impl PublishItemHandler {
    pub fn new(content: Arc<dyn ContentRepository>, collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            content,
            collections,
        }
    }

    pub async fn handle(&self, cmd: PublishItemCommand) -> Result<ContentItem, CatalogError> {
        // Reject uploads into collections that don't exist, up front.
        if self.collections.get(&cmd.collection_id).await?.is_none() {
            return Err(CatalogError::CollectionNotFound(cmd.collection_id));
        }

        let item = ContentItem::create(NewContentItem {
            collection_id: cmd.collection_id,
            title: cmd.title,
            description: cmd.description,
            kind: cmd.kind,
            premium: cmd.premium,
            media: cmd.media,
            tags: cmd.tags,
        })?;

        self.content.insert(item.clone()).await?;
        self.collections
            .apply_delta(&item.collection_id, StatsDelta::create(item.premium))
            .await?;

        Ok(item)
    }
}
