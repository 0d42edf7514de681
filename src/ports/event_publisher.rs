//! Event publisher port - post-commit membership effect fan-out.

use async_trait::async_trait;

use crate::domain::foundation::StoreError;
use crate::domain::membership::MembershipEffect;

/// Port for publishing membership effects after a transition commits.
///
/// Effects are advisory (audit, cache invalidation, notifications);
/// publication failure must not roll back the committed transition.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one effect.
    async fn publish(&self, effect: MembershipEffect) -> Result<(), StoreError>;
}
