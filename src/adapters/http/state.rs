//! Shared HTTP application state.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::handlers::billing::WebhookPipeline;
use crate::application::handlers::catalog::{
    BrowseContentHandler, CreateCollectionHandler, GetContentHandler, ListCollectionsHandler,
    PublishItemHandler, RemoveItemHandler, SetPremiumHandler,
};
use crate::application::handlers::membership::{ClaimResolver, EnrollUserHandler};
use crate::domain::foundation::UserId;
use crate::ports::{CollectionStore, ContentRepository, EntitlementStore, UserDirectory};

/// Shared application state, cloned per request.
///
/// Constructed once at startup with whichever adapter set is wired in
/// (postgres in production, in-memory in tests) and passed by reference
/// everywhere - no hidden singletons.
#[derive(Clone)]
pub struct AppState {
    pub entitlements: Arc<dyn EntitlementStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub content: Arc<dyn ContentRepository>,
    pub collections: Arc<dyn CollectionStore>,
    pub pipeline: Arc<WebhookPipeline>,
}

impl AppState {
    // Handlers are cheap bundles of Arcs; build them per request.

    pub fn claim_resolver(&self) -> ClaimResolver {
        ClaimResolver::new(self.entitlements.clone())
    }

    pub fn browse_content_handler(&self) -> BrowseContentHandler {
        BrowseContentHandler::new(self.content.clone(), self.claim_resolver())
    }

    pub fn get_content_handler(&self) -> GetContentHandler {
        GetContentHandler::new(self.content.clone(), self.claim_resolver())
    }

    pub fn publish_item_handler(&self) -> PublishItemHandler {
        PublishItemHandler::new(self.content.clone(), self.collections.clone())
    }

    pub fn set_premium_handler(&self) -> SetPremiumHandler {
        SetPremiumHandler::new(self.content.clone(), self.collections.clone())
    }

    pub fn remove_item_handler(&self) -> RemoveItemHandler {
        RemoveItemHandler::new(self.content.clone(), self.collections.clone())
    }

    pub fn create_collection_handler(&self) -> CreateCollectionHandler {
        CreateCollectionHandler::new(self.collections.clone())
    }

    pub fn list_collections_handler(&self) -> ListCollectionsHandler {
        ListCollectionsHandler::new(self.collections.clone())
    }

    pub fn enroll_user_handler(&self) -> EnrollUserHandler {
        EnrollUserHandler::new(self.entitlements.clone(), self.directory.clone())
    }
}

/// Caller identity established by the gateway in front of this service.
///
/// Authentication itself is out of scope here; the edge resolves the
/// session and forwards the opaque user id in `x-user-id`. Absent or
/// empty means anonymous.
pub fn caller_from(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| UserId::new(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_is_anonymous() {
        assert!(caller_from(&HeaderMap::new()).is_none());
    }

    #[test]
    fn header_resolves_to_user() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("u1"));
        assert_eq!(caller_from(&headers).unwrap().as_str(), "u1");
    }

    #[test]
    fn empty_header_is_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static(""));
        assert!(caller_from(&headers).is_none());
    }
}
