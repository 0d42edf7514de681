//! User directory port - provider customer to local user resolution.
//!
//! The directory is owned by the registration collaborator; this
//! subsystem only reads it to route subscription events and writes the
//! linkage once at registration time.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerRef, StoreError, UserId};

/// Port for resolving provider customer references.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Records that `customer_ref` belongs to `user_id`. Called once per
    /// user when registration creates the provider customer.
    async fn link(&self, user_id: &UserId, customer_ref: &CustomerRef) -> Result<(), StoreError>;

    /// Resolves a customer reference to the local user, if the linkage
    /// has been recorded. `None` is not an error here - the caller
    /// decides whether an unresolved customer is reportable.
    async fn resolve(&self, customer_ref: &CustomerRef) -> Result<Option<UserId>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn UserDirectory) {}
    }
}
