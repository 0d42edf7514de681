//! PostgreSQL implementation of the CollectionStore port.
//!
//! The counter delta is one guarded UPDATE touching both columns, so a
//! concurrent reader sees either the old pair or the new pair. The
//! guards encode the aggregate invariants; a delta that would break them
//! matches no row and commits nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::catalog::{CatalogError, Collection, CollectionStats, StatsDelta};
use crate::domain::catalog::InvariantViolation;
use crate::domain::foundation::{CollectionId, StoreError, Timestamp};
use crate::ports::CollectionStore;

/// PostgreSQL-backed [`CollectionStore`].
pub struct PostgresCollectionStore {
    pool: PgPool,
}

impl PostgresCollectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    thumbnail_url: String,
    tags: Vec<String>,
    total_count: i32,
    premium_count: i32,
    created_at: DateTime<Utc>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Collection {
            id: CollectionId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            tags: row.tags,
            stats: CollectionStats {
                total: row.total_count.max(0) as u32,
                premium: row.premium_count.max(0) as u32,
            },
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

const COLLECTION_COLUMNS: &str =
    "id, name, description, thumbnail_url, tags, total_count, premium_count, created_at";

#[async_trait]
impl CollectionStore for PostgresCollectionStore {
    async fn create(&self, collection: Collection) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO collections
                (id, name, description, thumbnail_url, tags, total_count, premium_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(collection.id.as_uuid())
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(&collection.thumbnail_url)
        .bind(&collection.tags)
        .bind(collection.stats.total as i32)
        .bind(collection.stats.premium as i32)
        .bind(collection.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists);
        }
        Ok(())
    }

    async fn get(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError> {
        let row = sqlx::query_as::<_, CollectionRow>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Collection>, StoreError> {
        let rows = sqlx::query_as::<_, CollectionRow>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn apply_delta(
        &self,
        id: &CollectionId,
        delta: StatsDelta,
    ) -> Result<CollectionStats, CatalogError> {
        let updated = sqlx::query_as::<_, (i32, i32)>(
            r#"
            UPDATE collections
            SET total_count = total_count + $2,
                premium_count = premium_count + $3
            WHERE id = $1
              AND total_count + $2 >= 0
              AND premium_count + $3 >= 0
              AND premium_count + $3 <= total_count + $2
            RETURNING total_count, premium_count
            "#,
        )
        .bind(id.as_uuid())
        .bind(delta.total)
        .bind(delta.premium)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Store(e.to_string()))?;

        if let Some((total, premium)) = updated {
            return Ok(CollectionStats {
                total: total.max(0) as u32,
                premium: premium.max(0) as u32,
            });
        }

        // Nothing matched: unknown collection or a guard tripped.
        let current = self
            .get(id)
            .await
            .map_err(|e| CatalogError::Store(e.to_string()))?
            .ok_or(CatalogError::CollectionNotFound(*id))?;

        Err(CatalogError::AggregateInvariant {
            collection: *id,
            violation: InvariantViolation {
                total: current.stats.total,
                premium: current.stats.premium,
                delta_total: delta.total,
                delta_premium: delta.premium,
            },
        })
    }
}
