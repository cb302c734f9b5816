//! Periodic network snapshot: fetch, parse, persist, cleanup

pub mod cleanup;
pub mod fetch;
pub mod parse;
pub mod payload;
pub mod persist;
pub mod scheduler;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::errors::PipelineError;
use crate::domain::ports::{MetricsStore, NetworkSource};
use crate::utils::logging;

pub use cleanup::CleanupStage;
pub use fetch::FetchStage;
pub use parse::ParseStage;
pub use payload::MetricsPayload;
pub use persist::PersistStage;
pub use scheduler::{run_purge, MetricsScheduler};

/// One step of the pipeline. Stages run in order over a shared payload.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, payload: &mut MetricsPayload) -> Result<(), PipelineError>;
}

pub struct MetricsPipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl MetricsPipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// fetch -> parse -> persist -> cleanup
    pub fn standard(node: Arc<dyn NetworkSource>, store: Arc<dyn MetricsStore>) -> Self {
        Self::new(vec![
            Box::new(FetchStage::new(node)),
            Box::new(ParseStage),
            Box::new(PersistStage::new(store)),
            Box::new(CleanupStage),
        ])
    }

    /// Run every stage; the first failure aborts the run
    pub async fn run(&self) -> Result<MetricsPayload, PipelineError> {
        let mut payload = MetricsPayload::new(Utc::now());
        for stage in &self.stages {
            logging::log_debug(&format!("[pipeline] task started: {}", stage.name()));
            let started = Instant::now();
            stage.run(&mut payload).await?;
            logging::log_debug(&format!(
                "[pipeline] task finished: {} in {}ms",
                stage.name(),
                started.elapsed().as_millis()
            ));
        }
        Ok(payload)
    }
}
