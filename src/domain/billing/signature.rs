//! Webhook signature verification.
//!
//! Authenticates inbound events against the shared signing secret using
//! the provider's timestamped HMAC-SHA256 scheme, then hands the body to
//! the typed parser. A request that fails here never reaches the
//! dispatcher.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{BillingEvent, WebhookError};

/// Events older than this (per their signed timestamp) are rejected to
/// bound replay.
const MAX_SIGNATURE_AGE_SECS: i64 = 300;

/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed `t=<unix>,v1=<hex>` signature header.
///
/// Unknown key-value pairs are skipped for forward compatibility; a
/// header without both `t` and `v1` is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signature: Vec<u8>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut signature = None;

        for part in header.split(',') {
            let (key, value) = part.split_once('=')?;
            match key.trim() {
                "t" => timestamp = value.parse::<i64>().ok(),
                "v1" => signature = hex::decode(value).ok(),
                _ => {}
            }
        }

        Some(SignatureHeader {
            timestamp: timestamp?,
            signature: signature?,
        })
    }
}

/// Verifier holding the shared webhook signing secret.
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    /// Creates a verifier from the configured signing secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies the signature header against the raw body and parses the
    /// event.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` - header missing or unparseable, timestamp
    ///   outside tolerance, or HMAC mismatch
    /// - `PayloadMalformed` - body unparseable after signature acceptance
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<BillingEvent, WebhookError> {
        let header =
            SignatureHeader::parse(signature_header).ok_or(WebhookError::SignatureInvalid)?;

        self.check_timestamp(header.timestamp)?;

        let expected = self.compute(header.timestamp, payload);
        if !constant_time_eq(&expected, &header.signature) {
            return Err(WebhookError::SignatureInvalid);
        }

        BillingEvent::parse(payload)
    }

    fn check_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let age = chrono::Utc::now().timestamp() - timestamp;
        if age > MAX_SIGNATURE_AGE_SECS || age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::SignatureInvalid);
        }
        Ok(())
    }

    fn compute(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time byte comparison; length mismatch short-circuits, which
/// leaks only the length (already public via the header).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
pub(crate) fn sign_for_tests(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
