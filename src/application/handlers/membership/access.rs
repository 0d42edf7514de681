//! Claim resolution for content-serving paths.
//!
//! Turns an optional caller into the [`AccessClaim`] the gate consumes.
//! Fail-secure: any store trouble yields the free claim rather than an
//! error, so entitlement plumbing never breaks a content request - the
//! caller just sees the upgrade-required view.

use std::sync::Arc;

use tracing::warn;

use crate::domain::catalog::AccessClaim;
use crate::domain::foundation::{StoreError, UserId};
use crate::ports::EntitlementStore;

/// Resolves callers to entitlement claims against the last committed
/// membership record.
#[derive(Clone)]
pub struct ClaimResolver {
    store: Arc<dyn EntitlementStore>,
}

impl ClaimResolver {
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    /// Claim for an optional caller. Anonymous callers, unknown users,
    /// and store failures all resolve to the free claim.
    pub async fn claim_for(&self, user_id: Option<&UserId>) -> AccessClaim {
        let Some(user_id) = user_id else {
            return AccessClaim::anonymous();
        };

        match self.store.get(user_id).await {
            Ok(record) => AccessClaim::from_record(Some(&record)),
            Err(StoreError::NotFound) => AccessClaim::anonymous(),
            Err(err) => {
                warn!(%user_id, %err, "claim resolution failed, treating caller as free");
                AccessClaim::anonymous()
            }
        }
    }
}
