//! SetPremiumHandler - premium flag toggles with counter maintenance.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ContentItem, StatsDelta};
use crate::domain::foundation::{ContentId, StoreError};
use crate::ports::{CollectionStore, ContentRepository};

/// Command to set an item's premium flag.
#[derive(Debug, Clone)]
pub struct SetPremiumCommand {
    pub content_id: ContentId,
    pub premium: bool,
}

/// Handler for premium toggles.
///
/// The repository reports whether the flag actually changed; only a real
/// change moves the collection's premium counter, so re-sending the same
/// flag is harmless.
pub struct SetPremiumHandler {
    content: Arc<dyn ContentRepository>,
    collections: Arc<dyn CollectionStore>,
}

impl SetPremiumHandler {
    pub fn new(content: Arc<dyn ContentRepository>, collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            content,
            collections,
        }
    }

    pub async fn handle(&self, cmd: SetPremiumCommand) -> Result<ContentItem, CatalogError> {
        let toggle = match self.content.set_premium(&cmd.content_id, cmd.premium).await {
            Ok(toggle) => toggle,
            Err(StoreError::NotFound) => return Err(CatalogError::ItemNotFound(cmd.content_id)),
            Err(err) => return Err(err.into()),
        };

        if toggle.changed {
            self.collections
                .apply_delta(&toggle.item.collection_id, StatsDelta::retag(cmd.premium))
                .await?;
        }

        Ok(toggle.item)
    }
}
