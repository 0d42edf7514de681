//! The webhook processing pipeline.
//!
//! Verify, dedup, serialize per customer, transition, commit. One
//! instance serves the whole process; the verifier and dedup window are
//! owned here, the stores arrive through ports.
//!
//! Commit protocol: read the record, run the pure transition, then
//! compare-and-swap keyed on the record's `last_event_at`. A failed swap
//! means a concurrent writer committed first; the whole transition is
//! retried against the fresh record, so a redelivered event that loses
//! the timestamp race simply resolves to a stale no-op on the next read.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::billing::{
    BillingEvent, DedupWindow, EventPayload, WebhookError, WebhookVerifier,
};
use crate::domain::foundation::{CustomerRef, StoreError, UserId};
use crate::domain::membership::{transition, TierPolicy, TransitionOutcome};
use crate::ports::{EntitlementStore, EventPublisher, UserDirectory};

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// How many recently applied event ids to remember.
    pub dedup_capacity: usize,
    /// Bounded wait for a customer's serialization lane.
    pub lane_max_wait: Duration,
    /// Attempts for the read-transition-CAS loop before giving up.
    pub max_cas_retries: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            dedup_capacity: 1024,
            lane_max_wait: Duration::from_secs(2),
            max_cas_retries: 3,
        }
    }
}

/// Terminal acknowledgment states. Everything here answers 2xx to the
/// provider; failures that should be redelivered surface as
/// [`WebhookError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The transition committed.
    Applied { user_id: UserId },
    /// The event id was already applied; nothing re-ran.
    Duplicate,
    /// The event timestamp is older than the record; dropped.
    Stale,
    /// The event carries no tier meaning (unknown kind, non-subscription
    /// checkout).
    Ignored,
}

/// One pipeline instance per process.
pub struct WebhookPipeline {
    verifier: WebhookVerifier,
    policy: TierPolicy,
    dedup: Mutex<DedupWindow>,
    lanes: super::CustomerLanes,
    store: Arc<dyn EntitlementStore>,
    directory: Arc<dyn UserDirectory>,
    publisher: Arc<dyn EventPublisher>,
    max_cas_retries: u32,
}

impl WebhookPipeline {
    pub fn new(
        verifier: WebhookVerifier,
        policy: TierPolicy,
        store: Arc<dyn EntitlementStore>,
        directory: Arc<dyn UserDirectory>,
        publisher: Arc<dyn EventPublisher>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            verifier,
            policy,
            dedup: Mutex::new(DedupWindow::new(settings.dedup_capacity)),
            lanes: super::CustomerLanes::new(settings.lane_max_wait),
            store,
            directory,
            publisher,
            max_cas_retries: settings.max_cas_retries,
        }
    }

    /// Processes one signed webhook request end to end.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` / `PayloadMalformed` - rejected before any
    ///   state is touched
    /// - `CustomerUnresolved` - no local user for the event; left
    ///   unacknowledged so the provider retries after linkage lands
    /// - `LaneUnavailable` - serialization slot not acquired in time
    /// - `ConcurrentUpdateExhausted` - CAS lost on every attempt
    pub async fn process(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<ProcessOutcome, WebhookError> {
        let event = self.verifier.verify(payload, signature_header)?;

        if self.seen(&event) {
            debug!(event_id = %event.id, "duplicate event acknowledged");
            return Ok(ProcessOutcome::Duplicate);
        }

        // Kinds and modes with no tier meaning are acknowledged before
        // touching lanes or stores.
        let no_op = match &event.payload {
            EventPayload::Unknown { kind } => Some(kind.as_str()),
            EventPayload::CheckoutCompleted { mode, .. } if !mode.is_subscription() => {
                Some("checkout.session.completed (non-subscription mode)")
            }
            _ => None,
        };
        if let Some(kind) = no_op {
            info!(kind, event_id = %event.id, "event acknowledged without effect");
            self.remember(&event);
            return Ok(ProcessOutcome::Ignored);
        }

        let subject = subject(&event).ok_or_else(|| {
            WebhookError::PayloadMalformed("event has no customer subject".into())
        })?;

        let _lane = self
            .lanes
            .acquire(&subject.lane)
            .await
            .map_err(|_| WebhookError::LaneUnavailable)?;

        let user_id = self.resolve_user(&subject).await?;
        let outcome = self.apply(&user_id, &event).await?;
        self.remember(&event);
        Ok(outcome)
    }

    async fn apply(
        &self,
        user_id: &UserId,
        event: &BillingEvent,
    ) -> Result<ProcessOutcome, WebhookError> {
        for attempt in 0..self.max_cas_retries {
            let record = match self.store.get(user_id).await {
                Ok(record) => record,
                Err(StoreError::NotFound) => {
                    return Err(WebhookError::CustomerUnresolved(user_id.to_string()));
                }
                Err(err) => return Err(err.into()),
            };

            match transition(&record, event, &self.policy) {
                TransitionOutcome::Stale => {
                    debug!(
                        event_id = %event.id,
                        event_at = event.created,
                        last_event_at = record.last_event_at,
                        "stale event dropped"
                    );
                    return Ok(ProcessOutcome::Stale);
                }
                TransitionOutcome::Ignored(reason) => {
                    info!(event_id = %event.id, ?reason, "event ignored");
                    return Ok(ProcessOutcome::Ignored);
                }
                TransitionOutcome::Applied {
                    record: next,
                    effects,
                } => {
                    let committed = self
                        .store
                        .compare_and_swap(user_id, record.last_event_at, next)
                        .await?;
                    if !committed {
                        debug!(event_id = %event.id, attempt, "lost compare-and-swap, retrying");
                        continue;
                    }

                    info!(
                        event_id = %event.id,
                        user_id = %user_id,
                        kind = event.payload.kind(),
                        "membership transition committed"
                    );
                    for effect in effects {
                        if let Err(err) = self.publisher.publish(effect).await {
                            // Effects are advisory; the transition stays
                            // committed.
                            warn!(%err, "effect publication failed");
                        }
                    }
                    return Ok(ProcessOutcome::Applied {
                        user_id: user_id.clone(),
                    });
                }
            }
        }

        Err(WebhookError::ConcurrentUpdateExhausted)
    }

    async fn resolve_user(&self, subject: &Subject) -> Result<UserId, WebhookError> {
        match &subject.identity {
            // Checkout sessions carry the local user directly.
            Identity::Local(user_id) => Ok(user_id.clone()),
            Identity::Provider(customer_ref) => self
                .directory
                .resolve(customer_ref)
                .await?
                .ok_or_else(|| WebhookError::CustomerUnresolved(customer_ref.to_string())),
        }
    }

    fn seen(&self, event: &BillingEvent) -> bool {
        self.dedup
            .lock()
            .expect("dedup window lock poisoned")
            .contains(&event.id)
    }

    fn remember(&self, event: &BillingEvent) {
        self.dedup
            .lock()
            .expect("dedup window lock poisoned")
            .remember(event.id.clone());
    }
}

/// Who an event is about, split into the serialization key and the
/// identity used for resolution. Checkout events embed the local user
/// but still serialize on the provider customer when it is present, so
/// a checkout and a subscription event for the same customer share one
/// lane.
struct Subject {
    lane: String,
    identity: Identity,
}

/// How the local user is found.
enum Identity {
    /// The event embeds the local user (checkout metadata).
    Local(UserId),
    /// The event names only the provider customer; resolved through the
    /// user directory.
    Provider(CustomerRef),
}

/// Extracts the event's subject. `None` for kinds that never reach the
/// state machine.
fn subject(event: &BillingEvent) -> Option<Subject> {
    match &event.payload {
        EventPayload::CheckoutCompleted {
            customer_ref,
            user_id,
            ..
        } => Some(Subject {
            lane: match customer_ref {
                Some(customer_ref) => format!("customer:{customer_ref}"),
                None => format!("user:{user_id}"),
            },
            identity: Identity::Local(user_id.clone()),
        }),
        EventPayload::SubscriptionChanged { customer_ref, .. }
        | EventPayload::SubscriptionDeleted { customer_ref } => Some(Subject {
            lane: format!("customer:{customer_ref}"),
            identity: Identity::Provider(customer_ref.clone()),
        }),
        EventPayload::Unknown { .. } => None,
    }
}
