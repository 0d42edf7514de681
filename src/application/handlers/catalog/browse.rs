//! Content browsing - listing and single-item fetch behind the gate.
//!
//! Both paths resolve the caller's claim the same way and consult the
//! same `gate::can_view` predicate; the listing is just that predicate
//! folded over a page. Keeping one decision point is what guarantees a
//! listing never shows an item the fetch would then refuse.

use std::sync::Arc;

use crate::application::handlers::membership::ClaimResolver;
use crate::domain::catalog::{gate, CatalogError, ContentItem, ContentKind};
use crate::domain::foundation::{CollectionId, ContentId, UserId};
use crate::ports::{ContentFilter, ContentRepository};

/// Default page size for listings.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Hard ceiling on page size.
const MAX_PAGE_SIZE: usize = 100;

/// One page of gated results, with the pagination shape the frontend
/// renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

/// Listing query: explicit filters plus the caller.
#[derive(Debug, Clone, Default)]
pub struct BrowseContentQuery {
    pub caller: Option<UserId>,
    pub collection_id: Option<CollectionId>,
    pub kind: Option<ContentKind>,
    pub premium: Option<bool>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Handler for gated listings.
pub struct BrowseContentHandler {
    content: Arc<dyn ContentRepository>,
    claims: ClaimResolver,
}

impl BrowseContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, claims: ClaimResolver) -> Self {
        Self { content, claims }
    }

    /// Lists items the caller may see, newest first.
    ///
    /// # Errors
    ///
    /// `CatalogError::PremiumRequired` when a non-entitled caller
    /// explicitly asks for premium-only results.
    pub async fn handle(&self, query: BrowseContentQuery) -> Result<Page<ContentItem>, CatalogError> {
        let claim = self.claims.claim_for(query.caller.as_ref()).await;

        // An explicit premium-only request from a free caller could only
        // ever return an empty page; answer honestly instead.
        if query.premium == Some(true) && !claim.tier.is_premium() {
            return Err(CatalogError::PremiumRequired);
        }

        let filter = ContentFilter {
            collection_id: query.collection_id,
            kind: query.kind,
            premium: query.premium,
        };
        let all = self.content.list(&filter).await?;
        let visible: Vec<ContentItem> = gate::visible(&claim, &all).into_iter().cloned().collect();

        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let total = visible.len();
        let pages = (total + limit - 1) / limit;
        let items = visible
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(Page {
            items,
            total,
            page,
            limit,
            pages,
        })
    }
}

/// Single-item fetch query.
#[derive(Debug, Clone)]
pub struct GetContentQuery {
    pub caller: Option<UserId>,
    pub content_id: ContentId,
}

/// Handler for gated single-item fetches.
pub struct GetContentHandler {
    content: Arc<dyn ContentRepository>,
    claims: ClaimResolver,
}

impl GetContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, claims: ClaimResolver) -> Self {
        Self { content, claims }
    }

    /// Fetches one item if the gate allows it.
    ///
    /// # Errors
    ///
    /// - `CatalogError::ItemNotFound` for an unknown id
    /// - `CatalogError::PremiumRequired` when the gate refuses
    pub async fn handle(&self, query: GetContentQuery) -> Result<ContentItem, CatalogError> {
        let item = self
            .content
            .fetch(&query.content_id)
            .await?
            .ok_or(CatalogError::ItemNotFound(query.content_id))?;

        let claim = self.claims.claim_for(query.caller.as_ref()).await;
        if !gate::can_view(&claim, &item) {
            return Err(CatalogError::PremiumRequired);
        }

        Ok(item)
    }
}
