//! PostgreSQL implementation of the UserDirectory port.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CustomerRef, StoreError, UserId};
use crate::ports::UserDirectory;

/// PostgreSQL-backed [`UserDirectory`], one row per customer linkage.
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn link(&self, user_id: &UserId, customer_ref: &CustomerRef) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO customer_links (customer_ref, user_id)
            VALUES ($1, $2)
            ON CONFLICT (customer_ref) DO UPDATE SET user_id = EXCLUDED.user_id
            "#,
        )
        .bind(customer_ref.as_str())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn resolve(&self, customer_ref: &CustomerRef) -> Result<Option<UserId>, StoreError> {
        let user_id = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM customer_links WHERE customer_ref = $1",
        )
        .bind(customer_ref.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        user_id
            .map(|id| UserId::new(id).map_err(StoreError::backend))
            .transpose()
    }
}
