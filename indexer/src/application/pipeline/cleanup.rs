use async_trait::async_trait;

use super::payload::MetricsPayload;
use super::Stage;
use crate::domain::errors::PipelineError;
use crate::utils::logging;

pub struct CleanupStage;

#[async_trait]
impl Stage for CleanupStage {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    async fn run(&self, payload: &mut MetricsPayload) -> Result<(), PipelineError> {
        logging::log_info(&format!(
            "[pipeline] sync at {} complete: height={} validators={} delegations={}",
            payload.sync_time.to_rfc3339(),
            payload.height,
            payload.validators.len(),
            payload.delegations.len()
        ));
        Ok(())
    }
}
