//! Entitlement synchronization tuning

use serde::Deserialize;
use std::time::Duration;

use crate::application::handlers::billing::PipelineSettings;

use super::error::ValidationError;

/// Tuning for the webhook pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Recently applied event ids to remember for deduplication.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    /// Bounded wait for a customer's serialization lane, milliseconds.
    #[serde(default = "default_lane_wait_ms")]
    pub lane_wait_ms: u64,

    /// Read-transition-CAS attempts before reporting exhaustion.
    #[serde(default = "default_cas_retries")]
    pub cas_retries: u32,
}

fn default_dedup_capacity() -> usize {
    1024
}

fn default_lane_wait_ms() -> u64 {
    2000
}

fn default_cas_retries() -> u32 {
    3
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dedup_capacity: default_dedup_capacity(),
            lane_wait_ms: default_lane_wait_ms(),
            cas_retries: default_cas_retries(),
        }
    }
}

impl SyncConfig {
    /// Converts to the pipeline's settings struct.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            dedup_capacity: self.dedup_capacity,
            lane_max_wait: Duration::from_millis(self.lane_wait_ms),
            max_cas_retries: self.cas_retries,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cas_retries == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sync.cas_retries",
                reason: "must be at least 1".into(),
            });
        }
        if self.lane_wait_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sync.lane_wait_ms",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
