//! In-memory user directory for tests and single-node development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerRef, StoreError, UserId};
use crate::ports::UserDirectory;

/// In-memory [`UserDirectory`] mapping customer refs to local users.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    links: RwLock<HashMap<String, UserId>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn link(&self, user_id: &UserId, customer_ref: &CustomerRef) -> Result<(), StoreError> {
        self.links
            .write()
            .await
            .insert(customer_ref.as_str().to_string(), user_id.clone());
        Ok(())
    }

    async fn resolve(&self, customer_ref: &CustomerRef) -> Result<Option<UserId>, StoreError> {
        Ok(self.links.read().await.get(customer_ref.as_str()).cloned())
    }
}
