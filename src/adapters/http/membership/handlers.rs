//! HTTP handlers for membership endpoints.

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::application::handlers::membership::EnrollUserCommand;
use crate::domain::foundation::{CustomerRef, StoreError, UserId};
use crate::domain::membership::{MembershipRecord, Tier};
use crate::ports::EntitlementStore;

use super::super::state::{caller_from, AppState};

/// Body for user enrollment, sent by the registration collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollUserRequest {
    pub user_id: String,
    /// Provider customer created during registration, if any.
    pub customer_ref: Option<String>,
}

/// Membership summary served to clients. Provider references stay
/// internal except the subscription linkage flag.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub user_id: UserId,
    pub tier: Tier,
    pub has_subscription: bool,
}

impl From<MembershipRecord> for MembershipResponse {
    fn from(record: MembershipRecord) -> Self {
        Self {
            user_id: record.user_id,
            tier: record.tier,
            has_subscription: record.subscription_ref.is_some(),
        }
    }
}

/// `POST /api/users` - enroll a newly registered user.
pub async fn enroll_user(
    State(state): State<AppState>,
    Json(request): Json<EnrollUserRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let user_id = UserId::new(request.user_id)
        .map_err(|err| MembershipApiError::BadRequest(err.to_string()))?;

    let record = state
        .enroll_user_handler()
        .handle(EnrollUserCommand {
            user_id,
            customer_ref: request.customer_ref.map(CustomerRef::new),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse::from(record)),
    ))
}

/// `GET /api/membership` - the caller's own membership summary.
pub async fn get_membership(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MembershipResponse>, MembershipApiError> {
    let user_id = caller_from(&headers).ok_or(MembershipApiError::Unauthenticated)?;

    let record = state
        .entitlements
        .get(&user_id)
        .await
        .map_err(MembershipApiError::from)?;

    Ok(Json(record.into()))
}

/// Error mapping for the membership endpoints.
pub enum MembershipApiError {
    Unauthenticated,
    BadRequest(String),
    NotEnrolled,
    AlreadyEnrolled,
    Internal(String),
}

impl From<StoreError> for MembershipApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => MembershipApiError::NotEnrolled,
            StoreError::AlreadyExists => MembershipApiError::AlreadyEnrolled,
            StoreError::Backend(reason) => MembershipApiError::Internal(reason),
        }
    }
}

impl IntoResponse for MembershipApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MembershipApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required".into())
            }
            MembershipApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            MembershipApiError::NotEnrolled => {
                (StatusCode::NOT_FOUND, "No membership record".into())
            }
            MembershipApiError::AlreadyEnrolled => {
                (StatusCode::CONFLICT, "User already enrolled".into())
            }
            MembershipApiError::Internal(reason) => {
                error!(error = %reason, "membership store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
