//! Error taxonomy for webhook processing.
//!
//! Splits failures by what the provider should do next: verification
//! failures are rejected and never retried by us, transition failures are
//! left unacknowledged so the provider redelivers, and stale or duplicate
//! events are not errors at all (they acknowledge as no-ops).

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::StoreError;

/// Errors that occur while verifying or applying a provider event.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header missing, malformed, outside the timestamp
    /// tolerance window, or not matching the payload.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// Body could not be parsed after the signature was accepted.
    #[error("Malformed payload: {0}")]
    PayloadMalformed(String),

    /// No local user maps to the event's customer reference. Usually a
    /// provisioning-order race: the webhook arrived before the linkage
    /// was recorded locally.
    #[error("No local user for customer {0}")]
    CustomerUnresolved(String),

    /// The read-transition-CAS loop lost every attempt.
    #[error("Concurrent update retries exhausted")]
    ConcurrentUpdateExhausted,

    /// The customer's serialization lane could not be acquired within the
    /// bounded wait.
    #[error("Customer lane busy")]
    LaneUnavailable,

    /// The entitlement store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl WebhookError {
    /// Returns true if the provider should redeliver this event.
    ///
    /// Retryable conditions may resolve on their own: the user linkage can
    /// arrive, contention can clear, the store can come back.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::CustomerUnresolved(_)
                | WebhookError::ConcurrentUpdateExhausted
                | WebhookError::LaneUnavailable
                | WebhookError::Store(_)
        )
    }

    /// Maps the error to the acknowledgment status returned to the
    /// provider. Non-2xx triggers provider-side retry per its own policy.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureInvalid => StatusCode::UNAUTHORIZED,
            WebhookError::PayloadMalformed(_) => StatusCode::BAD_REQUEST,
            WebhookError::CustomerUnresolved(_)
            | WebhookError::ConcurrentUpdateExhausted
            | WebhookError::LaneUnavailable
            | WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for WebhookError {
    fn from(err: StoreError) -> Self {
        WebhookError::Store(err.to_string())
    }
}
