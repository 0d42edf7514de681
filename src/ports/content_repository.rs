//! Content repository port - item persistence.
//!
//! Listing here applies only the caller's explicit filters; entitlement
//! filtering happens in the application layer through the gate, so both
//! the listing and single-item paths share one decision point.

use async_trait::async_trait;

use crate::domain::catalog::{ContentItem, ContentKind};
use crate::domain::foundation::{CollectionId, ContentId, StoreError};

/// Explicit (non-entitlement) listing filters.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub collection_id: Option<CollectionId>,
    pub kind: Option<ContentKind>,
    pub premium: Option<bool>,
}

/// Result of a premium toggle, reported by the store so the caller can
/// derive the counter delta without a read-modify-write race.
#[derive(Debug, Clone)]
pub struct PremiumToggle {
    /// The item after the toggle.
    pub item: ContentItem,
    /// Whether the flag actually changed.
    pub changed: bool,
}

/// Port for content item persistence.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Inserts a new item.
    async fn insert(&self, item: ContentItem) -> Result<(), StoreError>;

    /// Fetches an item by id.
    async fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError>;

    /// Sets the premium flag, reporting whether it changed. Atomic with
    /// respect to concurrent toggles of the same item.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the item does not exist.
    async fn set_premium(
        &self,
        id: &ContentId,
        premium: bool,
    ) -> Result<PremiumToggle, StoreError>;

    /// Deletes an item, returning it so the caller can negate its
    /// counter contribution.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the item does not exist.
    async fn delete(&self, id: &ContentId) -> Result<ContentItem, StoreError>;

    /// Lists items matching the filter, newest first. Unpaginated: the
    /// application layer gates and paginates.
    async fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError>;
}
