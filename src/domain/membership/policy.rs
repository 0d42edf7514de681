//! Mapping from provider subscription statuses to local tiers.
//!
//! The provider reports many lifecycle statuses (`active`, `trialing`,
//! `past_due`, `unpaid`, `incomplete`, ...). Which of those count as
//! premium is an operator decision, so the mapping is a configurable
//! table rather than a hardcoded check.

use std::collections::HashSet;

use super::Tier;

/// Statuses granted premium when nothing is configured.
const DEFAULT_PREMIUM_STATUSES: [&str; 2] = ["active", "trialing"];

/// Policy table resolving a provider subscription status to a [`Tier`].
///
/// Any status not present in the premium set maps to [`Tier::Free`];
/// unknown statuses are therefore conservative by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPolicy {
    premium_statuses: HashSet<String>,
}

impl TierPolicy {
    /// Builds a policy from an explicit premium status set.
    ///
    /// Statuses are matched case-sensitively; providers emit lowercase.
    pub fn new(premium_statuses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            premium_statuses: premium_statuses.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a provider status string to a tier.
    pub fn tier_for_status(&self, status: &str) -> Tier {
        if self.premium_statuses.contains(status) {
            Tier::Premium
        } else {
            Tier::Free
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PREMIUM_STATUSES)
    }
}
