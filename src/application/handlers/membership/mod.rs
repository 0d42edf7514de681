//! Membership application handlers - enrollment and claim resolution.

mod access;
mod enroll;

pub use access::ClaimResolver;
pub use enroll::{EnrollUserCommand, EnrollUserHandler};
