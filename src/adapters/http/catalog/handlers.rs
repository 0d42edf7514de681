//! HTTP handlers for catalog endpoints.
//!
//! Authentication and role checks run at the gateway in front of this
//! service; these handlers receive the already-resolved caller identity
//! in `x-user-id` and enforce entitlement, not authorization.

use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::application::handlers::catalog::{
    BrowseContentQuery, CreateCollectionCommand, GetContentQuery, PublishItemCommand,
    RemoveItemCommand, SetPremiumCommand,
};
use crate::domain::catalog::{CatalogError, MediaRef};
use crate::domain::foundation::ContentId;

use super::super::state::{caller_from, AppState};
use super::dto::{
    CollectionResponse, ContentItemResponse, ContentListResponse, CreateCollectionRequest,
    CreateContentRequest, ListContentParams, UpdateContentRequest,
};

/// `GET /api/content` - gated listing with filters and pagination.
pub async fn list_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListContentParams>,
) -> Result<Json<ContentListResponse>, CatalogApiError> {
    let page = state
        .browse_content_handler()
        .handle(BrowseContentQuery {
            caller: caller_from(&headers),
            collection_id: params.collection_id,
            kind: params.kind,
            premium: params.premium,
            page: params.page,
            limit: params.limit,
        })
        .await?;

    Ok(Json(page.into()))
}

/// `GET /api/content/{id}` - gated single-item fetch.
pub async fn get_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ContentId>,
) -> Result<Json<ContentItemResponse>, CatalogApiError> {
    let item = state
        .get_content_handler()
        .handle(GetContentQuery {
            caller: caller_from(&headers),
            content_id: id,
        })
        .await?;

    Ok(Json(item.into()))
}

/// `POST /api/content` - publish an item (upload flow).
pub async fn create_content(
    State(state): State<AppState>,
    Json(request): Json<CreateContentRequest>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let item = state
        .publish_item_handler()
        .handle(PublishItemCommand {
            collection_id: request.collection_id,
            title: request.title,
            description: request.description,
            kind: request.kind,
            premium: request.premium,
            media: MediaRef {
                file_url: request.file_url,
                thumbnail_url: request.thumbnail_url,
            },
            tags: request.tags,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContentItemResponse::from(item)),
    ))
}

/// `PATCH /api/content/{id}` - premium flag toggle (admin flow).
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<ContentItemResponse>, CatalogApiError> {
    let item = state
        .set_premium_handler()
        .handle(SetPremiumCommand {
            content_id: id,
            premium: request.premium,
        })
        .await?;

    Ok(Json(item.into()))
}

/// `DELETE /api/content/{id}` - remove an item (admin flow).
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<StatusCode, CatalogApiError> {
    state
        .remove_item_handler()
        .handle(RemoveItemCommand { content_id: id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/collections` - collections with their counters.
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionResponse>>, CatalogApiError> {
    let collections = state.list_collections_handler().handle().await?;
    Ok(Json(collections.into_iter().map(Into::into).collect()))
}

/// `POST /api/collections` - create a collection.
pub async fn create_collection(
    State(state): State<AppState>,
    Json(request): Json<CreateCollectionRequest>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let collection = state
        .create_collection_handler()
        .handle(CreateCollectionCommand {
            name: request.name,
            description: request.description,
            thumbnail_url: request.thumbnail_url,
            tags: request.tags,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CollectionResponse::from(collection)),
    ))
}

/// Maps [`CatalogError`] onto HTTP responses.
///
/// Entitlement refusals surface as a generic upgrade-required 403, never
/// as an internal fault; counter invariant violations are logged loudly
/// because they mean a caller bug, and the stored counters are known to
/// be uncorrupted (the failed apply committed nothing).
pub struct CatalogApiError(CatalogError);

impl From<CatalogError> for CatalogApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CatalogError::ItemNotFound(_) | CatalogError::CollectionNotFound(_) => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            CatalogError::PremiumRequired => (
                StatusCode::FORBIDDEN,
                "Premium membership required".to_string(),
            ),
            CatalogError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            CatalogError::AggregateInvariant { .. } => {
                error!(error = %self.0, "aggregate counter contract violated by caller");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
            CatalogError::Store(_) => {
                error!(error = %self.0, "catalog store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
