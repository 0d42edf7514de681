//! In-memory membership effect bus.
//!
//! Synchronous, recording publisher used by tests and single-node
//! deployments; the captured effects double as test assertions the way a
//! real audit sink would consume them.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::StoreError;
use crate::domain::membership::MembershipEffect;
use crate::ports::EventPublisher;

/// In-memory [`EventPublisher`] that records everything published.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned; acceptable for tests
/// and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: RwLock<Vec<MembershipEffect>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all published effects (for assertions).
    pub fn published(&self) -> Vec<MembershipEffect> {
        self.published
            .read()
            .expect("InMemoryEventBus: lock poisoned")
            .clone()
    }

    /// Number of effects published so far.
    pub fn count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: lock poisoned")
            .len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, effect: MembershipEffect) -> Result<(), StoreError> {
        self.published
            .write()
            .expect("InMemoryEventBus: lock poisoned")
            .push(effect);
        Ok(())
    }
}
