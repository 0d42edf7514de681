//! Denormalized per-collection counters.
//!
//! Each collection carries (total, premium) counts of its items so
//! listings never scan. Both counters move together through one checked
//! [`StatsDelta`]; applying the fields independently would expose a
//! window where `premium > total` is observable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A delta that would break the counter invariants.
///
/// Signals a caller bug (an item being removed was never counted, or a
/// premium toggle ran twice); the failed apply commits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "delta ({delta_total:+}, {delta_premium:+}) on counters ({total}, {premium}) breaks invariants"
)]
pub struct InvariantViolation {
    pub total: u32,
    pub premium: u32,
    pub delta_total: i32,
    pub delta_premium: i32,
}

/// Combined adjustment to both counters of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub total: i32,
    pub premium: i32,
}

impl StatsDelta {
    /// Delta for creating an item.
    pub fn create(premium: bool) -> Self {
        Self {
            total: 1,
            premium: premium as i32,
        }
    }

    /// Delta for deleting an item.
    pub fn remove(premium: bool) -> Self {
        Self {
            total: -1,
            premium: -(premium as i32),
        }
    }

    /// Delta for flipping an item's premium flag to `premium`.
    pub fn retag(premium: bool) -> Self {
        Self {
            total: 0,
            premium: if premium { 1 } else { -1 },
        }
    }
}

/// Counter pair for one collection. Invariants: both non-negative,
/// `premium <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total: u32,
    pub premium: u32,
}

impl CollectionStats {
    /// Applies a combined delta, checked.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation`] if either counter would go negative
    /// or `premium` would exceed `total`. On error nothing changes - the
    /// caller must not commit.
    pub fn apply(&self, delta: StatsDelta) -> Result<CollectionStats, InvariantViolation> {
        let violation = InvariantViolation {
            total: self.total,
            premium: self.premium,
            delta_total: delta.total,
            delta_premium: delta.premium,
        };

        let total = self
            .total
            .checked_add_signed(delta.total)
            .ok_or(violation)?;
        let premium = self
            .premium
            .checked_add_signed(delta.premium)
            .ok_or(violation)?;

        if premium > total {
            return Err(violation);
        }

        Ok(CollectionStats { total, premium })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u32, premium: u32) -> CollectionStats {
        CollectionStats { total, premium }
    }

    #[test]
    fn create_increments_pair() {
        assert_eq!(stats(0, 0).apply(StatsDelta::create(true)).unwrap(), stats(1, 1));
        assert_eq!(stats(1, 1).apply(StatsDelta::create(false)).unwrap(), stats(2, 1));
    }

    #[test]
    fn remove_decrements_pair() {
        // Deleting the only premium item from {3, 1} lands on {2, 0}.
        assert_eq!(stats(3, 1).apply(StatsDelta::remove(true)).unwrap(), stats(2, 0));
        assert_eq!(stats(2, 0).apply(StatsDelta::remove(false)).unwrap(), stats(1, 0));
    }

    #[test]
    fn retag_moves_only_premium() {
        assert_eq!(stats(3, 1).apply(StatsDelta::retag(true)).unwrap(), stats(3, 2));
        assert_eq!(stats(3, 1).apply(StatsDelta::retag(false)).unwrap(), stats(3, 0));
    }

    #[test]
    fn total_cannot_go_negative() {
        assert!(stats(0, 0).apply(StatsDelta::remove(false)).is_err());
    }

    #[test]
    fn premium_cannot_go_negative() {
        assert!(stats(2, 0).apply(StatsDelta::retag(false)).is_err());
    }

    #[test]
    fn premium_cannot_exceed_total() {
        assert!(stats(1, 1).apply(StatsDelta::retag(true)).is_err());
        // Removing a non-premium item while every remaining item counts
        // as premium would leave premium > total.
        assert!(stats(1, 1).apply(StatsDelta::remove(false)).is_err());
    }

    #[test]
    fn failed_apply_changes_nothing() {
        let s = stats(1, 1);
        let _ = s.apply(StatsDelta::remove(false));
        assert_eq!(s, stats(1, 1));
    }

    #[test]
    fn violation_reports_inputs() {
        let err = stats(0, 0).apply(StatsDelta::remove(true)).unwrap_err();
        assert_eq!(err.total, 0);
        assert_eq!(err.delta_total, -1);
        assert_eq!(err.delta_premium, -1);
    }
}
