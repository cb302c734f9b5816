use std::sync::Arc;

use async_trait::async_trait;

use super::payload::MetricsPayload;
use super::Stage;
use crate::domain::errors::PipelineError;
use crate::domain::models::StatsBucket;
use crate::domain::ports::MetricsStore;

/// Buckets refreshed after every run
const STATS_BUCKETS: [StatsBucket; 2] = [StatsBucket::Hour, StatsBucket::Day];

pub struct PersistStage {
    store: Arc<dyn MetricsStore>,
}

impl PersistStage {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Stage for PersistStage {
    fn name(&self) -> &'static str {
        "persister"
    }

    async fn run(&self, payload: &mut MetricsPayload) -> Result<(), PipelineError> {
        self.store.import_addresses(&payload.reward_addresses()).await?;
        self.store.import_validators(&payload.validators).await?;
        self.store.import_validator_seqs(&payload.validator_seqs).await?;
        self.store.import_delegations(&payload.delegations).await?;

        if let Some(metric) = &payload.network_metric {
            self.store.create_network_metric(metric).await?;
        }

        for bucket in STATS_BUCKETS {
            self.store.create_network_stats(payload.sync_time, bucket).await?;
            self.store.create_validator_stats(payload.sync_time, bucket).await?;
        }
        Ok(())
    }
}
