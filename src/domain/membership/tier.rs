//! Membership tier definitions.

use serde::{Deserialize, Serialize};

/// Membership tier.
///
/// Determines whether premium content is visible to the user. Kept
/// deliberately small: the provider's many subscription statuses are
/// collapsed onto this pair by the [`TierPolicy`](super::TierPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Default tier; sees only non-premium content.
    Free,

    /// Paying (or trialing) subscriber; sees everything.
    Premium,
}

impl Tier {
    /// Returns true for the premium tier.
    pub fn is_premium(&self) -> bool {
        matches!(self, Tier::Premium)
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Free => "Free",
            Tier::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
