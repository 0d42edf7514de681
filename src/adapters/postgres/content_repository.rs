//! PostgreSQL implementation of the ContentRepository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::catalog::{ContentItem, ContentKind, MediaRef};
use crate::domain::foundation::{CollectionId, ContentId, StoreError, Timestamp};
use crate::ports::{ContentFilter, ContentRepository, PremiumToggle};

/// PostgreSQL-backed [`ContentRepository`].
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: uuid::Uuid,
    collection_id: uuid::Uuid,
    title: String,
    description: String,
    kind: String,
    premium: bool,
    file_url: String,
    thumbnail_url: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentItem {
    type Error = StoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(ContentItem {
            id: ContentId::from_uuid(row.id),
            collection_id: CollectionId::from_uuid(row.collection_id),
            title: row.title,
            description: row.description,
            kind: parse_kind(&row.kind)?,
            premium: row.premium,
            media: MediaRef {
                file_url: row.file_url,
                thumbnail_url: row.thumbnail_url,
            },
            tags: row.tags,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_kind(s: &str) -> Result<ContentKind, StoreError> {
    match s {
        "image" => Ok(ContentKind::Image),
        "video" => Ok(ContentKind::Video),
        other => Err(StoreError::Backend(format!("invalid content kind: {other}"))),
    }
}

fn kind_to_str(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Image => "image",
        ContentKind::Video => "video",
    }
}

const CONTENT_COLUMNS: &str =
    "id, collection_id, title, description, kind, premium, file_url, thumbnail_url, tags, created_at";

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn insert(&self, item: ContentItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO content_items
                (id, collection_id, title, description, kind, premium,
                 file_url, thumbnail_url, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.collection_id.as_uuid())
        .bind(&item.title)
        .bind(&item.description)
        .bind(kind_to_str(item.kind))
        .bind(item.premium)
        .bind(&item.media.file_url)
        .bind(&item.media.thumbnail_url)
        .bind(&item.tags)
        .bind(item.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_items WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn set_premium(
        &self,
        id: &ContentId,
        premium: bool,
    ) -> Result<PremiumToggle, StoreError> {
        // Row-locked read-then-write so a racing toggle cannot make two
        // callers both observe `changed`.
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::backend)?
        .ok_or(StoreError::NotFound)?;

        let changed = row.premium != premium;
        if changed {
            sqlx::query("UPDATE content_items SET premium = $2 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(premium)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)?;

        let mut item: ContentItem = row.try_into()?;
        item.premium = premium;
        Ok(PremiumToggle { item, changed })
    }

    async fn delete(&self, id: &ContentId) -> Result<ContentItem, StoreError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "DELETE FROM content_items WHERE id = $1 RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            SELECT {CONTENT_COLUMNS} FROM content_items
            WHERE ($1::uuid IS NULL OR collection_id = $1)
              AND ($2::text IS NULL OR kind = $2)
              AND ($3::boolean IS NULL OR premium = $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.collection_id.map(|c| *c.as_uuid()))
        .bind(filter.kind.map(kind_to_str))
        .bind(filter.premium)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_roundtrip() {
        for kind in [ContentKind::Image, ContentKind::Video] {
            assert_eq!(parse_kind(kind_to_str(kind)).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_backend_error() {
        assert!(matches!(parse_kind("audio"), Err(StoreError::Backend(_))));
    }
}
