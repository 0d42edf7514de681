//! Router for catalog endpoints.

use axum::routing::get;
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    create_collection, create_content, delete_content, get_content, list_collections,
    list_content, update_content,
};

/// Content item routes, mounted at `/content`.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_content).post(create_content))
        .route(
            "/:id",
            get(get_content).patch(update_content).delete(delete_content),
        )
}

/// Collection routes, mounted at `/collections`.
pub fn collection_routes() -> Router<AppState> {
    Router::new().route("/", get(list_collections).post(create_collection))
}
