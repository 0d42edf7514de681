//! HTTP handler for the provider webhook endpoint.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use crate::domain::billing::WebhookError;

use super::super::state::AppState;

/// Signature header sent by the provider.
const SIGNATURE_HEADER: &str = "stripe-signature";

/// `POST /api/webhooks/stripe`
///
/// The single inbound transport for provider events. The response is an
/// acknowledgment code only; any non-2xx makes the provider redeliver
/// per its own backoff, which is exactly what the retryable errors want.
pub async fn handle_provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebhookError::SignatureInvalid)?;

    state.pipeline.process(&body, signature).await?;

    // Duplicates, stale events, and ignored kinds all acknowledge
    // identically; the provider needs no distinction.
    Ok((StatusCode::OK, Json(json!({ "received": true }))))
}

/// Maps [`WebhookError`] onto the acknowledgment status.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            warn!(error = %self.0, "webhook left unacknowledged for redelivery");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
