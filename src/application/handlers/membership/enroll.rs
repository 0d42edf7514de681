//! EnrollUserHandler - registration-time membership provisioning.
//!
//! Called by the registration collaborator once it has created the
//! provider customer: seeds the free-tier record and records the
//! customer linkage the webhook pipeline resolves against. Webhooks that
//! beat this call report `CustomerUnresolved` and are redelivered, which
//! is why the linkage must be written here and nowhere else.

use std::sync::Arc;

use crate::domain::foundation::{CustomerRef, StoreError, UserId};
use crate::domain::membership::MembershipRecord;
use crate::ports::{EntitlementStore, UserDirectory};

/// Command to enroll a newly registered user.
#[derive(Debug, Clone)]
pub struct EnrollUserCommand {
    pub user_id: UserId,
    /// Provider customer created during registration, when the payment
    /// flow is configured.
    pub customer_ref: Option<CustomerRef>,
}

/// Handler for user enrollment.
pub struct EnrollUserHandler {
    store: Arc<dyn EntitlementStore>,
    directory: Arc<dyn UserDirectory>,
}

impl EnrollUserHandler {
    pub fn new(store: Arc<dyn EntitlementStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Creates the free-tier record and the customer linkage.
    ///
    /// # Errors
    ///
    /// - `StoreError::AlreadyExists` if the user is already enrolled
    /// - `StoreError::Backend` on persistence failure
    pub async fn handle(&self, cmd: EnrollUserCommand) -> Result<MembershipRecord, StoreError> {
        let record = MembershipRecord::register(cmd.user_id, cmd.customer_ref.clone());
        self.store.create(record.clone()).await?;

        if let Some(customer_ref) = &cmd.customer_ref {
            self.directory.link(&record.user_id, customer_ref).await?;
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryEntitlementStore, InMemoryUserDirectory};
    use crate::domain::membership::Tier;

    fn handler() -> (
        EnrollUserHandler,
        Arc<InMemoryEntitlementStore>,
        Arc<InMemoryUserDirectory>,
    ) {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        (
            EnrollUserHandler::new(store.clone(), directory.clone()),
            store,
            directory,
        )
    }

    #[tokio::test]
    async fn enrollment_seeds_free_record_and_linkage() {
        let (handler, store, directory) = handler();

        let record = handler
            .handle(EnrollUserCommand {
                user_id: UserId::new("u1").unwrap(),
                customer_ref: Some(CustomerRef::new("cus_1")),
            })
            .await
            .unwrap();

        assert_eq!(record.tier, Tier::Free);
        let stored = store.get(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(stored, record);
        let resolved = directory.resolve(&CustomerRef::new("cus_1")).await.unwrap();
        assert_eq!(resolved.unwrap().as_str(), "u1");
    }

    #[tokio::test]
    async fn enrollment_without_customer_skips_linkage() {
        let (handler, _store, directory) = handler();

        handler
            .handle(EnrollUserCommand {
                user_id: UserId::new("u2").unwrap(),
                customer_ref: None,
            })
            .await
            .unwrap();

        let resolved = directory.resolve(&CustomerRef::new("cus_2")).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn double_enrollment_conflicts() {
        let (handler, _store, _directory) = handler();
        let cmd = EnrollUserCommand {
            user_id: UserId::new("u1").unwrap(),
            customer_ref: None,
        };

        handler.handle(cmd.clone()).await.unwrap();
        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists)));
    }
}
