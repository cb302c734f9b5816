use std::sync::Arc;

use async_trait::async_trait;

use super::payload::MetricsPayload;
use super::Stage;
use crate::domain::errors::PipelineError;
use crate::domain::ports::NetworkSource;

/// Pulls the network snapshot from the node
pub struct FetchStage {
    node: Arc<dyn NetworkSource>,
}

impl FetchStage {
    pub fn new(node: Arc<dyn NetworkSource>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl Stage for FetchStage {
    fn name(&self) -> &'static str {
        "fetcher"
    }

    async fn run(&self, payload: &mut MetricsPayload) -> Result<(), PipelineError> {
        let network_name = self.node.network_name().await?;
        let node_version = self.node.node_version().await?;
        let current = self.node.current_validators().await?;
        let pending = self.node.pending_validators().await?;
        let height = self.node.current_height().await?;
        let min_stake = self.node.min_stake().await?;
        let blockchains = self.node.blockchains().await?;
        let peers = self.node.peers().await?;
        let tx_fee = self.node.tx_fee().await?;

        payload.network_name = network_name;
        payload.node_version = node_version;
        payload.height = i64::try_from(height)
            .map_err(|_| PipelineError::ParseError(format!("height {} out of range", height)))?;
        payload.current_validators = current.validators;
        payload.current_delegators = current.delegators;
        payload.pending_validators = pending.validators;
        payload.pending_delegators = pending.delegators;
        payload.blockchains = blockchains;
        payload.peers = peers;
        payload.min_stake = min_stake;
        payload.raw_tx_fee = tx_fee;
        Ok(())
    }
}
