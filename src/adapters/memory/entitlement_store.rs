//! In-memory entitlement store for tests and single-node development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{StoreError, UserId};
use crate::domain::membership::MembershipRecord;
use crate::ports::EntitlementStore;

/// In-memory [`EntitlementStore`].
///
/// The compare-and-swap runs entirely under the write lock, so it is
/// atomic exactly like the database adapter's conditional UPDATE. Reads
/// take the read lock only - gate lookups never contend with each other.
#[derive(Debug, Default)]
pub struct InMemoryEntitlementStore {
    records: RwLock<HashMap<String, MembershipRecord>>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held (test helper).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true when no records are held.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn get(&self, user_id: &UserId) -> Result<MembershipRecord, StoreError> {
        self.records
            .read()
            .await
            .get(user_id.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, record: MembershipRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(record.user_id.as_str()) {
            return Err(StoreError::AlreadyExists);
        }
        records.insert(record.user_id.as_str().to_string(), record);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected_sequence: i64,
        record: MembershipRecord,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let current = records
            .get_mut(user_id.as_str())
            .ok_or(StoreError::NotFound)?;
        if current.last_event_at != expected_sequence {
            return Ok(false);
        }
        *current = record;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::Tier;

    fn record(user: &str, last_event_at: i64) -> MembershipRecord {
        let mut r = MembershipRecord::register(UserId::new(user).unwrap(), None);
        r.last_event_at = last_event_at;
        r
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let store = InMemoryEntitlementStore::new();
        let result = store.get(&UserId::new("ghost").unwrap()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn create_then_get_roundtrips() {
        let store = InMemoryEntitlementStore::new();
        store.create(record("u1", 0)).await.unwrap();

        let fetched = store.get(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(fetched.tier, Tier::Free);
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let store = InMemoryEntitlementStore::new();
        store.create(record("u1", 0)).await.unwrap();

        let result = store.create(record("u1", 0)).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists)));
    }

    #[tokio::test]
    async fn cas_succeeds_on_matching_sequence() {
        let store = InMemoryEntitlementStore::new();
        store.create(record("u1", 0)).await.unwrap();

        let mut next = record("u1", 100);
        next.tier = Tier::Premium;
        let swapped = store
            .compare_and_swap(&UserId::new("u1").unwrap(), 0, next)
            .await
            .unwrap();

        assert!(swapped);
        let fetched = store.get(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(fetched.tier, Tier::Premium);
        assert_eq!(fetched.last_event_at, 100);
    }

    #[tokio::test]
    async fn cas_refuses_on_sequence_mismatch() {
        let store = InMemoryEntitlementStore::new();
        store.create(record("u1", 50)).await.unwrap();

        let swapped = store
            .compare_and_swap(&UserId::new("u1").unwrap(), 0, record("u1", 100))
            .await
            .unwrap();

        assert!(!swapped);
        let fetched = store.get(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(fetched.last_event_at, 50);
    }

    #[tokio::test]
    async fn cas_on_unknown_user_is_not_found() {
        let store = InMemoryEntitlementStore::new();
        let result = store
            .compare_and_swap(&UserId::new("ghost").unwrap(), 0, record("ghost", 1))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn concurrent_cas_admits_exactly_one_writer() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryEntitlementStore::new());
        store.create(record("u1", 0)).await.unwrap();

        let mut handles = Vec::new();
        for n in 1..=8i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .compare_and_swap(&UserId::new("u1").unwrap(), 0, record("u1", n))
                    .await
                    .unwrap()
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }
}
