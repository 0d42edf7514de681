//! End-to-end tests for the entitlement synchronization pipeline.
//!
//! Drives signed provider payloads through the full verify → dedup →
//! serialize → transition → commit path against the in-memory adapters,
//! then checks what the gate-facing store reports.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde_json::json;
use sha2::Sha256;

use velvet::adapters::memory::{
    InMemoryEntitlementStore, InMemoryEventBus, InMemoryUserDirectory,
};
use velvet::application::handlers::billing::{
    PipelineSettings, ProcessOutcome, WebhookPipeline,
};
use velvet::application::handlers::membership::{EnrollUserCommand, EnrollUserHandler};
use velvet::domain::billing::{WebhookError, WebhookVerifier};
use velvet::domain::foundation::{CustomerRef, UserId};
use velvet::domain::membership::{MembershipEffect, Tier, TierPolicy};
use velvet::ports::EntitlementStore;

const SECRET: &str = "whsec_integration_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    pipeline: WebhookPipeline,
    store: Arc<InMemoryEntitlementStore>,
    bus: Arc<InMemoryEventBus>,
    enroll: EnrollUserHandler,
}

fn app() -> TestApp {
    app_with(TierPolicy::default(), PipelineSettings::default())
}

fn app_with(policy: TierPolicy, settings: PipelineSettings) -> TestApp {
    let store = Arc::new(InMemoryEntitlementStore::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let enroll = EnrollUserHandler::new(store.clone(), directory.clone());
    let pipeline = WebhookPipeline::new(
        WebhookVerifier::new(SecretString::new(SECRET.to_string())),
        policy,
        store.clone(),
        directory,
        bus.clone(),
        settings,
    );
    TestApp {
        pipeline,
        store,
        bus,
        enroll,
    }
}

fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn envelope(id: &str, kind: &str, created: i64, object: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": id,
        "type": kind,
        "created": created,
        "data": { "object": object },
    }))
    .unwrap()
}

async fn deliver(app: &TestApp, payload: &[u8]) -> Result<ProcessOutcome, WebhookError> {
    let header = sign(SECRET, chrono::Utc::now().timestamp(), payload);
    app.pipeline.process(payload, &header).await
}

async fn enroll(app: &TestApp, user: &str, customer: &str) {
    app.enroll
        .handle(EnrollUserCommand {
            user_id: UserId::new(user).unwrap(),
            customer_ref: Some(CustomerRef::new(customer)),
        })
        .await
        .unwrap();
}

async fn record(app: &TestApp, user: &str) -> velvet::domain::membership::MembershipRecord {
    app.store.get(&UserId::new(user).unwrap()).await.unwrap()
}

// =============================================================================
// Lifecycle scenarios
// =============================================================================

#[tokio::test]
async fn checkout_completed_grants_premium_with_subscription_ref() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;

    let payload = envelope(
        "evt_1",
        "checkout.session.completed",
        100,
        json!({
            "mode": "subscription",
            "customer": "cus_1",
            "subscription": "sub_1",
            "metadata": { "userId": "u1" }
        }),
    );
    let outcome = deliver(&app, &payload).await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Applied { .. }));
    let r = record(&app, "u1").await;
    assert_eq!(r.tier, Tier::Premium);
    assert_eq!(r.subscription_ref.unwrap().as_str(), "sub_1");
}

#[tokio::test]
async fn subscription_deleted_reverts_to_free_and_clears_ref() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;

    deliver(
        &app,
        &envelope(
            "evt_1",
            "checkout.session.completed",
            100,
            json!({
                "mode": "subscription",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": { "userId": "u1" }
            }),
        ),
    )
    .await
    .unwrap();

    deliver(
        &app,
        &envelope(
            "evt_2",
            "customer.subscription.deleted",
            200,
            json!({ "id": "sub_1", "customer": "cus_1" }),
        ),
    )
    .await
    .unwrap();

    let r = record(&app, "u1").await;
    assert_eq!(r.tier, Tier::Free);
    assert!(r.subscription_ref.is_none());
}

#[tokio::test]
async fn redelivered_event_produces_exactly_one_transition() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;
    let payload = envelope(
        "evt_dup",
        "customer.subscription.created",
        100,
        json!({ "id": "sub_1", "customer": "cus_1", "status": "active" }),
    );

    assert!(matches!(
        deliver(&app, &payload).await.unwrap(),
        ProcessOutcome::Applied { .. }
    ));
    assert_eq!(
        deliver(&app, &payload).await.unwrap(),
        ProcessOutcome::Duplicate
    );
    assert_eq!(
        deliver(&app, &payload).await.unwrap(),
        ProcessOutcome::Duplicate
    );

    assert_eq!(record(&app, "u1").await.tier, Tier::Premium);
    let transitions = app
        .bus
        .published()
        .into_iter()
        .filter(|e| matches!(e, MembershipEffect::TierChanged { .. }))
        .count();
    assert_eq!(transitions, 1);
}

#[tokio::test]
async fn out_of_order_events_settle_on_latest_timestamp() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;

    // subscription-deleted (t=200) arrives before
    // subscription-created(active) (t=100).
    deliver(
        &app,
        &envelope(
            "evt_late",
            "customer.subscription.deleted",
            200,
            json!({ "id": "sub_1", "customer": "cus_1" }),
        ),
    )
    .await
    .unwrap();

    let stale = deliver(
        &app,
        &envelope(
            "evt_early",
            "customer.subscription.created",
            100,
            json!({ "id": "sub_1", "customer": "cus_1", "status": "active" }),
        ),
    )
    .await
    .unwrap();

    assert_eq!(stale, ProcessOutcome::Stale);
    assert_eq!(record(&app, "u1").await.tier, Tier::Free);
}

// =============================================================================
// Idempotence under redelivery storms
// =============================================================================

#[tokio::test]
async fn active_event_storm_is_idempotent() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;

    // Same logical event under fresh provider ids, as a provider resend
    // storm would look after a dedup window eviction.
    for n in 0..10 {
        let payload = envelope(
            &format!("evt_{n}"),
            "customer.subscription.updated",
            100,
            json!({ "id": "sub_1", "customer": "cus_1", "status": "active" }),
        );
        deliver(&app, &payload).await.unwrap();
    }

    let r = record(&app, "u1").await;
    assert_eq!(r.tier, Tier::Premium);
    assert_eq!(r.last_event_at, 100);
}

// =============================================================================
// Rejection paths
// =============================================================================

#[tokio::test]
async fn forged_signature_never_reaches_the_store() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;
    let payload = envelope(
        "evt_1",
        "customer.subscription.created",
        100,
        json!({ "id": "sub_1", "customer": "cus_1", "status": "active" }),
    );
    let header = sign("whsec_wrong", chrono::Utc::now().timestamp(), &payload);

    let result = app.pipeline.process(&payload, &header).await;

    assert!(matches!(result, Err(WebhookError::SignatureInvalid)));
    assert_eq!(record(&app, "u1").await.tier, Tier::Free);
}

#[tokio::test]
async fn malformed_body_with_valid_signature_is_rejected() {
    let app = app();
    let payload = b"{\"id\": \"evt_1\"".to_vec();
    let header = sign(SECRET, chrono::Utc::now().timestamp(), &payload);

    let result = app.pipeline.process(&payload, &header).await;
    assert!(matches!(result, Err(WebhookError::PayloadMalformed(_))));
}

#[tokio::test]
async fn webhook_before_enrollment_retries_until_linkage_lands() {
    let app = app();
    let payload = envelope(
        "evt_1",
        "customer.subscription.created",
        100,
        json!({ "id": "sub_1", "customer": "cus_1", "status": "active" }),
    );

    // Provisioning-order race: the webhook beats registration.
    let first = deliver(&app, &payload).await;
    assert!(matches!(first, Err(WebhookError::CustomerUnresolved(_))));

    enroll(&app, "u1", "cus_1").await;
    let retried = deliver(&app, &payload).await.unwrap();

    assert!(matches!(retried, ProcessOutcome::Applied { .. }));
    assert_eq!(record(&app, "u1").await.tier, Tier::Premium);
}

// =============================================================================
// Policy configuration
// =============================================================================

#[tokio::test]
async fn grace_period_policy_keeps_past_due_premium() {
    let app = app_with(
        TierPolicy::new(["active", "trialing", "past_due"]),
        PipelineSettings::default(),
    );
    enroll(&app, "u1", "cus_1").await;

    deliver(
        &app,
        &envelope(
            "evt_1",
            "customer.subscription.updated",
            100,
            json!({ "id": "sub_1", "customer": "cus_1", "status": "past_due" }),
        ),
    )
    .await
    .unwrap();

    assert_eq!(record(&app, "u1").await.tier, Tier::Premium);
}

#[tokio::test]
async fn default_policy_downgrades_past_due() {
    let app = app();
    enroll(&app, "u1", "cus_1").await;

    deliver(
        &app,
        &envelope(
            "evt_1",
            "customer.subscription.updated",
            100,
            json!({ "id": "sub_1", "customer": "cus_1", "status": "past_due" }),
        ),
    )
    .await
    .unwrap();

    assert_eq!(record(&app, "u1").await.tier, Tier::Free);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn interleaved_customers_do_not_interfere() {
    let app = Arc::new(app());
    for n in 0..6 {
        enroll(&app, &format!("u{n}"), &format!("cus_{n}")).await;
    }

    let mut handles = Vec::new();
    for n in 0..6 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            // Even customers subscribe; odd customers subscribe then
            // cancel with a later timestamp.
            let created = envelope(
                &format!("evt_created_{n}"),
                "customer.subscription.created",
                100,
                json!({ "id": format!("sub_{n}"), "customer": format!("cus_{n}"), "status": "active" }),
            );
            deliver(&app, &created).await.unwrap();
            if n % 2 == 1 {
                let deleted = envelope(
                    &format!("evt_deleted_{n}"),
                    "customer.subscription.deleted",
                    200,
                    json!({ "id": format!("sub_{n}"), "customer": format!("cus_{n}") }),
                );
                deliver(&app, &deleted).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for n in 0..6 {
        let expected = if n % 2 == 0 { Tier::Premium } else { Tier::Free };
        assert_eq!(record(&app, &format!("u{n}")).await.tier, expected, "u{n}");
    }
}
