//! Router for membership endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{enroll_user, get_membership};

/// Enrollment route, mounted at `/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(enroll_user))
}

/// Membership summary route, mounted at `/membership`.
pub fn membership_routes() -> Router<AppState> {
    Router::new().route("/", get(get_membership))
}
