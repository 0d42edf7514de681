//! Wire shapes for the catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::catalog::Page;
use crate::domain::catalog::{Collection, ContentItem, ContentKind};
use crate::domain::foundation::{CollectionId, ContentId, Timestamp};

/// A content item as served to clients. The payload URLs are included
/// only because the gate already ran; nothing below this layer returns
/// them unguarded.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItemResponse {
    pub id: ContentId,
    pub collection_id: CollectionId,
    pub title: String,
    pub description: String,
    pub kind: ContentKind,
    pub premium: bool,
    pub file_url: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

impl From<ContentItem> for ContentItemResponse {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            collection_id: item.collection_id,
            title: item.title,
            description: item.description,
            kind: item.kind,
            premium: item.premium,
            file_url: item.media.file_url,
            thumbnail_url: item.media.thumbnail_url,
            tags: item.tags,
            created_at: item.created_at,
        }
    }
}

/// Pagination block mirrored from the listing page.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationResponse {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

/// Listing response: items plus pagination.
#[derive(Debug, Clone, Serialize)]
pub struct ContentListResponse {
    pub content: Vec<ContentItemResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<ContentItem>> for ContentListResponse {
    fn from(page: Page<ContentItem>) -> Self {
        Self {
            pagination: PaginationResponse {
                total: page.total,
                page: page.page,
                limit: page.limit,
                pages: page.pages,
            },
            content: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListContentParams {
    pub collection_id: Option<CollectionId>,
    pub kind: Option<ContentKind>,
    pub premium: Option<bool>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Body for content creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    pub collection_id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub premium: bool,
    pub file_url: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body for the premium toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContentRequest {
    pub premium: bool,
}

/// A collection with its denormalized counters.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResponse {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub content_count: u32,
    pub premium_content_count: u32,
    pub created_at: Timestamp,
}

impl From<Collection> for CollectionResponse {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            thumbnail_url: collection.thumbnail_url,
            tags: collection.tags,
            content_count: collection.stats.total,
            premium_content_count: collection.stats.premium,
            created_at: collection.created_at,
        }
    }
}

/// Body for collection creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
