//! HTTP adapter - axum routers over the application handlers.

mod billing;
mod catalog;
mod membership;
mod state;

pub use state::{caller_from, AppState};

use axum::Router;

/// Assembles the full API router. The caller applies middleware layers
/// and state.
///
/// # Routes
///
/// - `POST /api/webhooks/stripe` - provider event intake
/// - `GET/POST /api/content`, `GET/PATCH/DELETE /api/content/{id}`
/// - `GET/POST /api/collections`
/// - `POST /api/users` - registration enrollment
/// - `GET /api/membership` - caller's membership summary
pub fn api_router() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/webhooks", billing::webhook_routes())
            .nest("/content", catalog::content_routes())
            .nest("/collections", catalog::collection_routes())
            .nest("/users", membership::user_routes())
            .nest("/membership", membership::membership_routes()),
    )
}
