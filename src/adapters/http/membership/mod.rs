//! Membership HTTP adapter.

mod handlers;
mod routes;

pub use handlers::{EnrollUserRequest, MembershipApiError, MembershipResponse};
pub use routes::{membership_routes, user_routes};
