//! Billing application handlers - the webhook processing pipeline.

mod lanes;
mod process_event;

pub use lanes::{CustomerLanes, LaneTimeout};
pub use process_event::{PipelineSettings, ProcessOutcome, WebhookPipeline};
