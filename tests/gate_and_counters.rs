//! Property and concurrency tests for the entitlement gate and the
//! collection counters.

use std::sync::Arc;

use proptest::prelude::*;

use velvet::adapters::memory::{InMemoryCollectionStore, InMemoryContentRepository};
use velvet::domain::catalog::{
    gate, AccessClaim, CatalogError, Collection, CollectionStats, ContentItem, ContentKind,
    MediaRef, NewContentItem, StatsDelta,
};
use velvet::domain::foundation::CollectionId;
use velvet::domain::membership::Tier;
use velvet::ports::{CollectionStore, ContentRepository};

fn item(collection_id: CollectionId, premium: bool) -> ContentItem {
    ContentItem::create(NewContentItem {
        collection_id,
        title: "t".into(),
        description: String::new(),
        kind: ContentKind::Image,
        premium,
        media: MediaRef {
            file_url: "s3://f".into(),
            thumbnail_url: "s3://t".into(),
        },
        tags: vec![],
    })
    .unwrap()
}

fn claim(tier: Tier) -> AccessClaim {
    AccessClaim { tier }
}

// =============================================================================
// Gate consistency (listing and single-item must agree)
// =============================================================================

proptest! {
    #[test]
    fn listing_decision_equals_single_item_decision(
        premium_flags in prop::collection::vec(any::<bool>(), 0..32),
        caller_premium in any::<bool>(),
    ) {
        let collection_id = CollectionId::new();
        let items: Vec<ContentItem> = premium_flags
            .iter()
            .map(|&premium| item(collection_id, premium))
            .collect();
        let tier = if caller_premium { Tier::Premium } else { Tier::Free };
        let claim = claim(tier);

        let listed = gate::visible(&claim, &items);

        for it in &items {
            let in_listing = listed.iter().any(|l| l.id == it.id);
            prop_assert_eq!(in_listing, gate::can_view(&claim, it));
        }
    }

    #[test]
    fn premium_callers_see_everything(premium_flags in prop::collection::vec(any::<bool>(), 0..32)) {
        let collection_id = CollectionId::new();
        let items: Vec<ContentItem> = premium_flags
            .iter()
            .map(|&premium| item(collection_id, premium))
            .collect();

        prop_assert_eq!(gate::visible(&claim(Tier::Premium), &items).len(), items.len());
    }

    #[test]
    fn free_callers_never_see_premium(premium_flags in prop::collection::vec(any::<bool>(), 0..32)) {
        let collection_id = CollectionId::new();
        let items: Vec<ContentItem> = premium_flags
            .iter()
            .map(|&premium| item(collection_id, premium))
            .collect();

        prop_assert!(gate::visible(&claim(Tier::Free), &items)
            .iter()
            .all(|it| !it.premium));
    }
}

// =============================================================================
// Counter invariants
// =============================================================================

proptest! {
    /// Applying any sequence of deltas either fails cleanly or keeps
    /// premium <= total; a failed apply never changes the counters.
    #[test]
    fn counters_hold_invariant_under_any_delta_sequence(
        deltas in prop::collection::vec((-2i32..=2, -2i32..=2), 0..64),
    ) {
        let mut stats = CollectionStats::default();
        for (total, premium) in deltas {
            match stats.apply(StatsDelta { total, premium }) {
                Ok(next) => {
                    prop_assert!(next.premium <= next.total);
                    stats = next;
                }
                Err(_) => {
                    // unchanged on failure
                    prop_assert!(stats.premium <= stats.total);
                }
            }
        }
    }
}

#[tokio::test]
async fn concurrent_creates_and_deletes_keep_invariant() {
    let store = Arc::new(InMemoryCollectionStore::new());
    let collection = Collection::create("C", "d", "s3://t", vec![]).unwrap();
    let id = collection.id;
    store.create(collection).await.unwrap();

    // Seed so deletes have something to remove.
    for n in 0..16 {
        store
            .apply_delta(&id, StatsDelta::create(n % 2 == 0))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for n in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let premium = n % 2 == 0;
            let delta = if n % 4 < 2 {
                StatsDelta::create(premium)
            } else {
                StatsDelta::remove(premium)
            };
            store.apply_delta(&id, delta).await
        }));
    }

    for handle in handles {
        // Every successful apply reports a valid pair.
        if let Ok(stats) = handle.await.unwrap() {
            assert!(stats.premium <= stats.total);
        }
    }

    let final_stats = store.get(&id).await.unwrap().unwrap().stats;
    assert!(final_stats.premium <= final_stats.total);
    assert_eq!(final_stats, CollectionStats { total: 16, premium: 8 });
}

#[tokio::test]
async fn deleting_premium_item_moves_both_counters_at_once() {
    let store = Arc::new(InMemoryCollectionStore::new());
    let repo = InMemoryContentRepository::new();
    let collection = Collection::create("C", "d", "s3://t", vec![]).unwrap();
    let id = collection.id;
    store.create(collection).await.unwrap();

    // {total: 3, premium: 1} via the same deltas the handlers use.
    let premium_item = item(id, true);
    repo.insert(premium_item.clone()).await.unwrap();
    store.apply_delta(&id, StatsDelta::create(true)).await.unwrap();
    for _ in 0..2 {
        let it = item(id, false);
        repo.insert(it).await.unwrap();
        store.apply_delta(&id, StatsDelta::create(false)).await.unwrap();
    }

    let removed = repo.delete(&premium_item.id).await.unwrap();
    let after = store
        .apply_delta(&id, StatsDelta::remove(removed.premium))
        .await
        .unwrap();

    // The combined-delta API returns the counters as one pair; there is
    // no observable {2, 1} intermediate state.
    assert_eq!(after, CollectionStats { total: 2, premium: 0 });
}

#[tokio::test]
async fn uncounted_removal_is_reported_not_committed() {
    let store = InMemoryCollectionStore::new();
    let collection = Collection::create("C", "d", "s3://t", vec![]).unwrap();
    let id = collection.id;
    store.create(collection).await.unwrap();

    let result = store.apply_delta(&id, StatsDelta::remove(true)).await;

    assert!(matches!(
        result,
        Err(CatalogError::AggregateInvariant { .. })
    ));
    let stats = store.get(&id).await.unwrap().unwrap().stats;
    assert_eq!(stats, CollectionStats::default());
}
