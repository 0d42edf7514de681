//! Router for webhook endpoints.
//!
//! Separate from the content routes because webhooks carry no user
//! session; authenticity comes from the signature alone.

use axum::routing::post;
use axum::Router;

use super::super::state::AppState;
use super::handlers::handle_provider_webhook;

/// `POST /stripe` - provider webhook intake.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_provider_webhook))
}
