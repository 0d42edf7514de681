//! Entitlement store port - durable membership records keyed by user.
//!
//! This is the only sanctioned mutation path for membership state. The
//! webhook pipeline always reads, transitions, then compare-and-swaps;
//! a CAS that reports `false` means another writer committed in between
//! and the whole transition must be retried against the fresh record.

use async_trait::async_trait;

use crate::domain::foundation::{StoreError, UserId};
use crate::domain::membership::MembershipRecord;

/// Port for membership record persistence.
///
/// Implementations must make `compare_and_swap` atomic per user: the
/// record is replaced only if its `last_event_at` still equals
/// `expected_sequence` at commit time.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Fetches the record for a known user.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` for an unknown user; a known user always
    /// has exactly one record.
    async fn get(&self, user_id: &UserId) -> Result<MembershipRecord, StoreError>;

    /// Inserts the registration-time record.
    ///
    /// # Errors
    ///
    /// `StoreError::AlreadyExists` if the user already has a record -
    /// records are never replaced through this path.
    async fn create(&self, record: MembershipRecord) -> Result<(), StoreError>;

    /// Atomically replaces the record if its `last_event_at` still equals
    /// `expected_sequence`. Returns `false` (without writing) when the
    /// comparison fails.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the user has no record.
    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected_sequence: i64,
        record: MembershipRecord,
    ) -> Result<bool, StoreError>;
}
