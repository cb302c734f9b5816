use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::NodeClientError;
use super::rpc::RpcClient;
use super::types::{Balance, Blockchain, BlockchainsResponse, MinStakeResponse, ValidatorsResponse};

#[derive(Debug, Deserialize)]
struct HeightResponse {
    height: String,
}

/// Client of the platform chain API
#[derive(Debug, Clone)]
pub struct PlatformClient {
    rpc: RpcClient,
}

impl PlatformClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(client, format!("{}/ext/P", base_url)),
        }
    }

    pub async fn current_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        self.rpc
            .call("platform.getCurrentValidators", json!({}))
            .await
    }

    pub async fn pending_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        self.rpc
            .call("platform.getPendingValidators", json!({}))
            .await
    }

    pub async fn balance(&self, address: &str) -> Result<Balance, NodeClientError> {
        self.rpc
            .call("platform.getBalance", json!({ "address": address }))
            .await
    }

    pub async fn min_stake(&self) -> Result<MinStakeResponse, NodeClientError> {
        self.rpc.call("platform.getMinStake", Value::Null).await
    }

    pub async fn blockchains(&self) -> Result<Vec<Blockchain>, NodeClientError> {
        let resp: BlockchainsResponse = self.rpc.call("platform.getBlockchains", Value::Null).await?;
        Ok(resp.blockchains)
    }

    pub async fn current_height(&self) -> Result<u64, NodeClientError> {
        let resp: HeightResponse = self.rpc.call("platform.getHeight", Value::Null).await?;
        resp.height.parse().map_err(|e| {
            NodeClientError::ResponseError(format!("invalid height {}: {}", resp.height, e))
        })
    }
}
