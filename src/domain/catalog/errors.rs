//! Error types for catalog operations.

use thiserror::Error;

use crate::domain::foundation::{CollectionId, ContentId, StoreError, ValidationError};

use super::stats::InvariantViolation;

/// Errors from catalog mutations and queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A counter delta would corrupt the collection's aggregate. This is
    /// a programming-contract violation on the caller's side; the store
    /// commits nothing.
    #[error("Counter invariant violated on collection {collection}: {violation}")]
    AggregateInvariant {
        collection: CollectionId,
        #[source]
        violation: InvariantViolation,
    },

    /// Referenced item does not exist.
    #[error("Content item {0} not found")]
    ItemNotFound(ContentId),

    /// Referenced collection does not exist.
    #[error("Collection {0} not found")]
    CollectionNotFound(CollectionId),

    /// The caller's tier does not cover the requested content.
    #[error("Premium membership required")]
    PremiumRequired,

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_error_names_collection() {
        let collection = CollectionId::new();
        let err = CatalogError::AggregateInvariant {
            collection,
            violation: InvariantViolation {
                total: 0,
                premium: 0,
                delta_total: -1,
                delta_premium: 0,
            },
        };
        assert!(err.to_string().contains(&collection.to_string()));
    }

    #[test]
    fn store_error_converts() {
        let err: CatalogError = StoreError::NotFound.into();
        assert!(matches!(err, CatalogError::Store(_)));
    }
}
