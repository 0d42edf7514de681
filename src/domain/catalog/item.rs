//! Content items - the individual gallery entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CollectionId, ContentId, Timestamp, ValidationError};

/// Media type of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
}

/// Opaque storage coordinates for an item's media, produced by the
/// upload collaborator. Never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub file_url: String,
    pub thumbnail_url: String,
}

/// One gallery entry.
///
/// Lifecycle: created by the upload flow, premium flag toggled by the
/// admin flow, deleted by the admin flow. Each of those mutations must
/// keep the owning collection's counters true, which is the caller's job
/// (see the catalog application handlers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub collection_id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: ContentKind,
    pub premium: bool,
    pub media: MediaRef,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

/// Maximum accepted title length.
const MAX_TITLE_LEN: usize = 100;

/// Maximum accepted description length.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Fields supplied when creating an item.
#[derive(Debug, Clone)]
pub struct NewContentItem {
    pub collection_id: CollectionId,
    pub title: String,
    pub description: String,
    pub kind: ContentKind,
    pub premium: bool,
    pub media: MediaRef,
    pub tags: Vec<String>,
}

impl ContentItem {
    /// Builds a new item from validated inputs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty or over-long title,
    /// over-long description, or empty media URLs.
    pub fn create(input: NewContentItem) -> Result<Self, ValidationError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(ValidationError::invalid_format(
                "title",
                format!("cannot be more than {MAX_TITLE_LEN} characters"),
            ));
        }
        if input.description.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::invalid_format(
                "description",
                format!("cannot be more than {MAX_DESCRIPTION_LEN} characters"),
            ));
        }
        if input.media.file_url.is_empty() {
            return Err(ValidationError::empty_field("file_url"));
        }
        if input.media.thumbnail_url.is_empty() {
            return Err(ValidationError::empty_field("thumbnail_url"));
        }

        Ok(ContentItem {
            id: ContentId::new(),
            collection_id: input.collection_id,
            title,
            description: input.description,
            kind: input.kind,
            premium: input.premium,
            media: input.media,
            tags: input.tags,
            created_at: Timestamp::now(),
        })
    }
}
