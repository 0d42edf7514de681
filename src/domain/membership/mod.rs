//! Membership domain module.
//!
//! The locally held entitlement state and the pure transition function
//! that is the only thing allowed to change it.
//!
//! # Module Structure
//!
//! - `record` - MembershipRecord, the per-user entitlement document
//! - `tier` - the Free/Premium pair
//! - `policy` - provider status to tier mapping (configurable)
//! - `transition` - the state machine applied per provider event

mod policy;
mod record;
mod tier;
mod transition;

pub use policy::TierPolicy;
pub use record::MembershipRecord;
pub use tier::Tier;
pub use transition::{transition, IgnoreReason, MembershipEffect, TransitionOutcome};
