//! Webhook HTTP adapter.

mod handlers;
mod routes;

pub use handlers::WebhookApiError;
pub use routes::webhook_routes;
