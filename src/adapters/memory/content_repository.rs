//! In-memory content repository for tests and single-node development.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::{ContentItem, ContentKind};
use crate::domain::foundation::{ContentId, StoreError};
use crate::ports::{ContentFilter, ContentRepository, PremiumToggle};

/// In-memory [`ContentRepository`].
///
/// Items are held in insertion order; listings iterate in reverse so the
/// newest item comes first, matching the database adapter's ordering.
#[derive(Debug, Default)]
pub struct InMemoryContentRepository {
    items: RwLock<Vec<ContentItem>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(filter: &ContentFilter, item: &ContentItem) -> bool {
    filter
        .collection_id
        .map_or(true, |c| item.collection_id == c)
        && filter.kind.map_or(true, |k| item.kind == k)
        && filter.premium.map_or(true, |p| item.premium == p)
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, item: ContentItem) -> Result<(), StoreError> {
        self.items.write().await.push(item);
        Ok(())
    }

    async fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| &item.id == id)
            .cloned())
    }

    async fn set_premium(
        &self,
        id: &ContentId,
        premium: bool,
    ) -> Result<PremiumToggle, StoreError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or(StoreError::NotFound)?;
        let changed = item.premium != premium;
        item.premium = premium;
        Ok(PremiumToggle {
            item: item.clone(),
            changed,
        })
    }

    async fn delete(&self, id: &ContentId) -> Result<ContentItem, StoreError> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| &item.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(items.remove(index))
    }

    async fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .rev()
            .filter(|item| matches(filter, item))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{MediaRef, NewContentItem};
    use crate::domain::foundation::CollectionId;

    fn item(collection: CollectionId, title: &str, premium: bool, kind: ContentKind) -> ContentItem {
        ContentItem::create(NewContentItem {
            collection_id: collection,
            title: title.into(),
            description: String::new(),
            kind,
            premium,
            media: MediaRef {
                file_url: "s3://f".into(),
                thumbnail_url: "s3://t".into(),
            },
            tags: vec![],
        })
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_fetch() {
        let repo = InMemoryContentRepository::new();
        let i = item(CollectionId::new(), "a", false, ContentKind::Image);
        repo.insert(i.clone()).await.unwrap();

        let fetched = repo.fetch(&i.id).await.unwrap();
        assert_eq!(fetched, Some(i));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = InMemoryContentRepository::new();
        let c = CollectionId::new();
        let first = item(c, "first", false, ContentKind::Image);
        let second = item(c, "second", false, ContentKind::Image);
        repo.insert(first).await.unwrap();
        repo.insert(second).await.unwrap();

        let listed = repo.list(&ContentFilter::default()).await.unwrap();
        assert_eq!(listed[0].title, "second");
        assert_eq!(listed[1].title, "first");
    }

    #[tokio::test]
    async fn list_applies_filters() {
        let repo = InMemoryContentRepository::new();
        let c1 = CollectionId::new();
        let c2 = CollectionId::new();
        repo.insert(item(c1, "a", true, ContentKind::Image)).await.unwrap();
        repo.insert(item(c1, "b", false, ContentKind::Video)).await.unwrap();
        repo.insert(item(c2, "c", true, ContentKind::Image)).await.unwrap();

        let by_collection = repo
            .list(&ContentFilter {
                collection_id: Some(c1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_collection.len(), 2);

        let premium_videos = repo
            .list(&ContentFilter {
                kind: Some(ContentKind::Video),
                premium: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(premium_videos.len(), 1);
        assert_eq!(premium_videos[0].title, "b");
    }

    #[tokio::test]
    async fn set_premium_reports_change() {
        let repo = InMemoryContentRepository::new();
        let i = item(CollectionId::new(), "a", false, ContentKind::Image);
        repo.insert(i.clone()).await.unwrap();

        let toggled = repo.set_premium(&i.id, true).await.unwrap();
        assert!(toggled.changed);
        assert!(toggled.item.premium);

        let again = repo.set_premium(&i.id, true).await.unwrap();
        assert!(!again.changed);
    }

    #[tokio::test]
    async fn delete_returns_item_once() {
        let repo = InMemoryContentRepository::new();
        let i = item(CollectionId::new(), "a", true, ContentKind::Image);
        repo.insert(i.clone()).await.unwrap();

        let deleted = repo.delete(&i.id).await.unwrap();
        assert!(deleted.premium);

        let result = repo.delete(&i.id).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
