//! The membership transition function.
//!
//! Pure: `(record, event, policy) -> outcome`. All data needed to decide
//! is in the arguments; persistence and effect publication happen in the
//! application layer after the store's compare-and-swap commits the new
//! record.
//!
//! Ordering rule: an event whose provider timestamp is older than the
//! record's `last_event_at` lost the race to a newer event and is a stale
//! duplicate. Events at the same timestamp reapply idempotently - the
//! target state is a function of the event, not of the current tier.

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingEvent, EventPayload};
use crate::domain::foundation::{SubscriptionRef, UserId};

use super::{MembershipRecord, Tier, TierPolicy};

/// Result of applying one provider event to one membership record.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The event produced a new record to commit, plus the effects to
    /// publish once the commit succeeds.
    Applied {
        record: MembershipRecord,
        effects: Vec<MembershipEffect>,
    },

    /// The event is older than the last applied one; drop it.
    Stale,

    /// The event carries no tier meaning for this subsystem.
    Ignored(IgnoreReason),
}

/// Why an event was ignored. Ignored events are acknowledged, never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Checkout completed in a non-subscription mode.
    NotSubscriptionMode,
    /// Event kind this subsystem does not handle.
    UnknownKind,
}

/// Observable consequences of an applied transition, published to the
/// event bus after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEffect {
    TierChanged {
        user_id: UserId,
        from: Tier,
        to: Tier,
        at: i64,
    },
    SubscriptionLinked {
        user_id: UserId,
        subscription_ref: SubscriptionRef,
    },
    SubscriptionUnlinked {
        user_id: UserId,
    },
}

/// Applies one event to one record.
///
/// The target tier depends only on the event (and the status policy),
/// never on the current tier, so redelivery is harmless. References are
/// still refreshed on tier-idempotent transitions, and every applied
/// transition stamps `last_event_at` with the event's timestamp.
pub fn transition(
    record: &MembershipRecord,
    event: &BillingEvent,
    policy: &TierPolicy,
) -> TransitionOutcome {
    if event.created < record.last_event_at {
        return TransitionOutcome::Stale;
    }

    let (target_tier, next_subscription) = match &event.payload {
        EventPayload::CheckoutCompleted {
            mode,
            subscription_ref,
            ..
        } => {
            if !mode.is_subscription() {
                return TransitionOutcome::Ignored(IgnoreReason::NotSubscriptionMode);
            }
            (Tier::Premium, subscription_ref.clone())
        }
        EventPayload::SubscriptionChanged {
            subscription_ref,
            status,
            ..
        } => (
            policy.tier_for_status(status),
            Some(subscription_ref.clone()),
        ),
        EventPayload::SubscriptionDeleted { .. } => (Tier::Free, None),
        EventPayload::Unknown { .. } => {
            return TransitionOutcome::Ignored(IgnoreReason::UnknownKind);
        }
    };

    let mut next = record.clone();
    next.tier = target_tier;
    next.subscription_ref = next_subscription;
    next.last_event_at = event.created;

    let effects = collect_effects(record, &next, event.created);

    TransitionOutcome::Applied {
        record: next,
        effects,
    }
}

fn collect_effects(
    before: &MembershipRecord,
    after: &MembershipRecord,
    at: i64,
) -> Vec<MembershipEffect> {
    let mut effects = Vec::new();

    if before.tier != after.tier {
        effects.push(MembershipEffect::TierChanged {
            user_id: after.user_id.clone(),
            from: before.tier,
            to: after.tier,
            at,
        });
    }

    match (&before.subscription_ref, &after.subscription_ref) {
        (old, Some(new)) if old.as_ref() != Some(new) => {
            effects.push(MembershipEffect::SubscriptionLinked {
                user_id: after.user_id.clone(),
                subscription_ref: new.clone(),
            });
        }
        (Some(_), None) => {
            effects.push(MembershipEffect::SubscriptionUnlinked {
                user_id: after.user_id.clone(),
            });
        }
        _ => {}
    }

    effects
}
