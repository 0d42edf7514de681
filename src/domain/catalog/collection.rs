//! Content collections - the gallery groupings items belong to.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CollectionId, Timestamp, ValidationError};

use super::CollectionStats;

/// Maximum accepted name length.
const MAX_NAME_LEN: usize = 100;

/// Maximum accepted description length.
const MAX_DESCRIPTION_LEN: usize = 1000;

/// A gallery grouping with its denormalized item counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub stats: CollectionStats,
    pub created_at: Timestamp,
}

impl Collection {
    /// Builds a new empty collection.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for empty or over-long name/description
    /// or a missing thumbnail.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        thumbnail_url: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        let description = description.into();
        let thumbnail_url = thumbnail_url.into();

        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(ValidationError::invalid_format(
                "name",
                format!("cannot be more than {MAX_NAME_LEN} characters"),
            ));
        }
        if description.is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::invalid_format(
                "description",
                format!("cannot be more than {MAX_DESCRIPTION_LEN} characters"),
            ));
        }
        if thumbnail_url.is_empty() {
            return Err(ValidationError::empty_field("thumbnail_url"));
        }

        Ok(Collection {
            id: CollectionId::new(),
            name,
            description,
            thumbnail_url,
            tags,
            stats: CollectionStats::default(),
            created_at: Timestamp::now(),
        })
    }
}
