//! Typed provider event model.
//!
//! The provider delivers a loosely structured JSON envelope; this module
//! narrows it into a tagged union keyed by event kind, each variant
//! carrying only the fields that kind guarantees. Unknown kinds survive
//! parsing as [`EventPayload::Unknown`] so the pipeline can acknowledge
//! them explicitly instead of guessing at fields.

use serde::Deserialize;
use std::fmt;

use crate::domain::foundation::{CustomerRef, SubscriptionRef, UserId};

use super::WebhookError;

/// Provider-assigned event identifier (e.g. `evt_xxx`), used for
/// deduplication only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderEventId(String);

impl ProviderEventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checkout session mode reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutMode {
    Subscription,
    Payment,
    Setup,
    Other(String),
}

impl CheckoutMode {
    fn parse(s: &str) -> Self {
        match s {
            "subscription" => CheckoutMode::Subscription,
            "payment" => CheckoutMode::Payment,
            "setup" => CheckoutMode::Setup,
            other => CheckoutMode::Other(other.to_string()),
        }
    }

    /// Only subscription-mode checkouts affect membership tier.
    pub fn is_subscription(&self) -> bool {
        matches!(self, CheckoutMode::Subscription)
    }
}

/// A verified, parsed provider event. Transient: it lives only long
/// enough to be applied, and its id long enough to fill the dedup window.
#[derive(Debug, Clone)]
pub struct BillingEvent {
    /// Provider event id, for deduplication.
    pub id: ProviderEventId,

    /// Provider-side creation time, unix seconds. Orders events per
    /// customer.
    pub created: i64,

    /// Kind-specific payload.
    pub payload: EventPayload,
}

/// Event payloads by kind.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// `checkout.session.completed` - a checkout finished. Only
    /// subscription-mode sessions carry tier meaning.
    CheckoutCompleted {
        mode: CheckoutMode,
        customer_ref: Option<CustomerRef>,
        subscription_ref: Option<SubscriptionRef>,
        user_id: UserId,
    },

    /// `customer.subscription.created` / `customer.subscription.updated` -
    /// the subscription exists with the given lifecycle status.
    SubscriptionChanged {
        customer_ref: CustomerRef,
        subscription_ref: SubscriptionRef,
        status: String,
    },

    /// `customer.subscription.deleted` - the subscription is gone.
    SubscriptionDeleted { customer_ref: CustomerRef },

    /// Any kind this subsystem does not handle. Acknowledged, never
    /// retried.
    Unknown { kind: String },
}

impl EventPayload {
    /// Short kind label for logging.
    pub fn kind(&self) -> &str {
        match self {
            EventPayload::CheckoutCompleted { .. } => "checkout.session.completed",
            EventPayload::SubscriptionChanged { .. } => "customer.subscription.changed",
            EventPayload::SubscriptionDeleted { .. } => "customer.subscription.deleted",
            EventPayload::Unknown { kind } => kind,
        }
    }
}

// Wire shapes. Only the fields we read are declared; the provider sends
// far more.

#[derive(Deserialize)]
struct RawEnvelope {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    created: i64,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct RawCheckoutSession {
    mode: String,
    customer: Option<String>,
    subscription: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Deserialize, Default)]
struct RawMetadata {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct RawSubscription {
    id: String,
    customer: String,
    status: String,
}

#[derive(Deserialize)]
struct RawDeletedSubscription {
    customer: String,
}

impl BillingEvent {
    /// Parses a raw (already signature-verified) payload into a typed
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::PayloadMalformed` when the envelope or the
    /// kind-specific object is missing required fields. Unknown kinds are
    /// not an error; they parse to [`EventPayload::Unknown`].
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        let envelope: RawEnvelope = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::PayloadMalformed(e.to_string()))?;

        let payload = match envelope.kind.as_str() {
            "checkout.session.completed" => {
                let session: RawCheckoutSession =
                    serde_json::from_value(envelope.data.object)
                        .map_err(|e| WebhookError::PayloadMalformed(e.to_string()))?;
                let mode = CheckoutMode::parse(&session.mode);
                let user_id = session
                    .metadata
                    .user_id
                    .as_deref()
                    .ok_or_else(|| {
                        WebhookError::PayloadMalformed(
                            "checkout session missing metadata.userId".into(),
                        )
                    })
                    .and_then(|id| {
                        UserId::new(id).map_err(|e| WebhookError::PayloadMalformed(e.to_string()))
                    })?;
                if mode.is_subscription() && session.subscription.is_none() {
                    return Err(WebhookError::PayloadMalformed(
                        "subscription-mode checkout missing subscription".into(),
                    ));
                }
                EventPayload::CheckoutCompleted {
                    mode,
                    customer_ref: session.customer.map(CustomerRef::new),
                    subscription_ref: session.subscription.map(SubscriptionRef::new),
                    user_id,
                }
            }
            "customer.subscription.created" | "customer.subscription.updated" => {
                let sub: RawSubscription = serde_json::from_value(envelope.data.object)
                    .map_err(|e| WebhookError::PayloadMalformed(e.to_string()))?;
                EventPayload::SubscriptionChanged {
                    customer_ref: CustomerRef::new(sub.customer),
                    subscription_ref: SubscriptionRef::new(sub.id),
                    status: sub.status,
                }
            }
            "customer.subscription.deleted" => {
                let sub: RawDeletedSubscription = serde_json::from_value(envelope.data.object)
                    .map_err(|e| WebhookError::PayloadMalformed(e.to_string()))?;
                EventPayload::SubscriptionDeleted {
                    customer_ref: CustomerRef::new(sub.customer),
                }
            }
            kind => EventPayload::Unknown {
                kind: kind.to_string(),
            },
        };

        Ok(BillingEvent {
            id: ProviderEventId::new(envelope.id),
            created: envelope.created,
            payload,
        })
    }
}
