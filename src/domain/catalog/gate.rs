//! The entitlement gate.
//!
//! The one predicate every content-serving path consults. Single-item
//! fetches and bulk listings must agree for every (claim, item) pair, so
//! the listing filter is defined in terms of the single-item check - there
//! is deliberately no second decision path to let them diverge.

use crate::domain::membership::{MembershipRecord, Tier};

use super::ContentItem;

/// The caller's entitlement, as far as the gate cares: just a tier.
///
/// Derived from the last committed membership record; a caller with no
/// record (anonymous, or membership not yet provisioned) is free. An
/// out-of-date record is never an error here - the gate only ever
/// computes from what was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessClaim {
    pub tier: Tier,
}

impl AccessClaim {
    /// Claim for a caller with no membership record.
    pub fn anonymous() -> Self {
        Self { tier: Tier::Free }
    }

    /// Claim derived from an optional membership record.
    pub fn from_record(record: Option<&MembershipRecord>) -> Self {
        Self {
            tier: record.map(|r| r.tier).unwrap_or(Tier::Free),
        }
    }
}

/// May this caller see this item's full resource?
pub fn can_view(claim: &AccessClaim, item: &ContentItem) -> bool {
    !item.premium || claim.tier.is_premium()
}

/// Filters a listing down to what the caller may see. Premium items are
/// excluded entirely for non-entitled callers, not returned with
/// restricted fields.
pub fn visible<'a>(claim: &AccessClaim, items: &'a [ContentItem]) -> Vec<&'a ContentItem> {
    items.iter().filter(|item| can_view(claim, item)).collect()
}
