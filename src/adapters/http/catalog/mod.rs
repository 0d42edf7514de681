//! Catalog HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use handlers::CatalogApiError;
pub use routes::{collection_routes, content_routes};
