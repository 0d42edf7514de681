//! The membership record - the locally held copy of a user's entitlement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerRef, SubscriptionRef, Timestamp, UserId};

use super::Tier;

/// Locally persisted membership state for one user.
///
/// Created at registration with [`Tier::Free`]; from then on mutated only
/// by [`transition`](super::transition) through the entitlement store's
/// compare-and-swap, and never deleted.
///
/// `last_event_at` is the provider timestamp of the most recently applied
/// event for this user. It orders provider events (stale events compare
/// below it and are dropped) and doubles as the expected value for the
/// store's compare-and-swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    /// The local user this record belongs to.
    pub user_id: UserId,

    /// Current tier, derived from provider events.
    pub tier: Tier,

    /// Provider customer reference, linked at registration. Absent for
    /// users who never touched the payment flow.
    pub customer_ref: Option<CustomerRef>,

    /// Provider subscription reference; present while a subscription is
    /// known, cleared on cancellation.
    pub subscription_ref: Option<SubscriptionRef>,

    /// Provider timestamp (unix seconds) of the last applied event.
    /// Zero until the first event lands.
    pub last_event_at: i64,

    /// When the record was created locally.
    pub created_at: Timestamp,
}

impl MembershipRecord {
    /// Creates the registration-time record: free tier, no subscription,
    /// no events applied yet.
    pub fn register(user_id: UserId, customer_ref: Option<CustomerRef>) -> Self {
        Self {
            user_id,
            tier: Tier::Free,
            customer_ref,
            subscription_ref: None,
            last_event_at: 0,
            created_at: Timestamp::now(),
        }
    }
}
