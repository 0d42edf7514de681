//! Payment provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::membership::TierPolicy;

use super::error::ValidationError;

/// Payment provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Webhook signing secret from the provider dashboard.
    pub webhook_secret: SecretString,

    /// Comma-separated subscription statuses that count as premium.
    /// Defaults to `active,trialing` when unset.
    #[serde(default)]
    pub premium_statuses: Option<String>,
}

impl PaymentConfig {
    /// Builds the status-to-tier policy table from configuration.
    pub fn tier_policy(&self) -> TierPolicy {
        match &self.premium_statuses {
            Some(raw) => TierPolicy::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            ),
            None => TierPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_WEBHOOK_SECRET"));
        }
        if !secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }
        if let Some(raw) = &self.premium_statuses {
            if raw.split(',').all(|s| s.trim().is_empty()) {
                return Err(ValidationError::InvalidValue {
                    field: "payment.premium_statuses",
                    reason: "must name at least one status".into(),
                });
            }
        }
        Ok(())
    }
}
