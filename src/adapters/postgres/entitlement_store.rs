//! PostgreSQL implementation of the EntitlementStore port.
//!
//! One row per membership record, keyed by user id. The compare-and-swap
//! is a conditional UPDATE on `last_event_at`, which makes the optimistic
//! concurrency contract a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{CustomerRef, StoreError, SubscriptionRef, Timestamp, UserId};
use crate::domain::membership::{MembershipRecord, Tier};
use crate::ports::EntitlementStore;

/// PostgreSQL-backed [`EntitlementStore`].
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    user_id: String,
    tier: String,
    customer_ref: Option<String>,
    subscription_ref: Option<String>,
    last_event_at: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for MembershipRecord {
    type Error = StoreError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(MembershipRecord {
            user_id: UserId::new(row.user_id).map_err(StoreError::backend)?,
            tier: parse_tier(&row.tier)?,
            customer_ref: row.customer_ref.map(CustomerRef::new),
            subscription_ref: row.subscription_ref.map(SubscriptionRef::new),
            last_event_at: row.last_event_at,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_tier(s: &str) -> Result<Tier, StoreError> {
    match s {
        "free" => Ok(Tier::Free),
        "premium" => Ok(Tier::Premium),
        other => Err(StoreError::Backend(format!("invalid tier value: {other}"))),
    }
}

fn tier_to_str(tier: Tier) -> &'static str {
    match tier {
        Tier::Free => "free",
        Tier::Premium => "premium",
    }
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn get(&self, user_id: &UserId) -> Result<MembershipRecord, StoreError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT user_id, tier, customer_ref, subscription_ref, last_event_at, created_at
            FROM membership_records
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn create(&self, record: MembershipRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO membership_records
                (user_id, tier, customer_ref, subscription_ref, last_event_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(tier_to_str(record.tier))
        .bind(record.customer_ref.as_ref().map(|c| c.as_str()))
        .bind(record.subscription_ref.as_ref().map(|s| s.as_str()))
        .bind(record.last_event_at)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists);
        }
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected_sequence: i64,
        record: MembershipRecord,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_records
            SET tier = $2,
                customer_ref = $3,
                subscription_ref = $4,
                last_event_at = $5
            WHERE user_id = $1 AND last_event_at = $6
            "#,
        )
        .bind(user_id.as_str())
        .bind(tier_to_str(record.tier))
        .bind(record.customer_ref.as_ref().map(|c| c.as_str()))
        .bind(record.subscription_ref.as_ref().map(|s| s.as_str()))
        .bind(record.last_event_at)
        .bind(expected_sequence)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Zero rows is either a lost race or a missing record; the
        // pipeline treats them differently.
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM membership_records WHERE user_id = $1)",
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if exists {
            Ok(false)
        } else {
            Err(StoreError::NotFound)
        }
    }
}
