//! Velvet - subscription gallery backend.
//!
//! The core is the entitlement synchronization subsystem: a signed
//! webhook pipeline that keeps local membership tiers consistent with
//! the payment provider, and the gate every content-serving path
//! consults before returning payload URLs.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
