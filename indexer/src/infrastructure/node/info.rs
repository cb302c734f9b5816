use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::NodeClientError;
use super::rpc::RpcClient;
use super::types::{Peer, PeersResponse, TxFeeResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockchainIdResponse {
    #[serde(rename = "blockchainID")]
    blockchain_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkIdResponse {
    #[serde(rename = "networkID")]
    network_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkNameResponse {
    network_name: String,
}

#[derive(Debug, Deserialize)]
struct NodeVersionResponse {
    version: String,
}

/// Client of the node's info API
#[derive(Debug, Clone)]
pub struct InfoClient {
    rpc: RpcClient,
}

impl InfoClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(client, format!("{}/ext/info", base_url)),
        }
    }

    /// Resolve a chain alias such as `X` into its blockchain id
    pub async fn blockchain_id(&self, alias: &str) -> Result<String, NodeClientError> {
        let resp: BlockchainIdResponse = self
            .rpc
            .call("info.getBlockchainID", json!({ "alias": alias }))
            .await?;
        Ok(resp.blockchain_id)
    }

    pub async fn network_id(&self) -> Result<u32, NodeClientError> {
        let resp: NetworkIdResponse = self.rpc.call("info.getNetworkID", Value::Null).await?;
        resp.network_id.parse().map_err(|e| {
            NodeClientError::ResponseError(format!("invalid network id {}: {}", resp.network_id, e))
        })
    }

    pub async fn network_name(&self) -> Result<String, NodeClientError> {
        let resp: NetworkNameResponse = self.rpc.call("info.getNetworkName", Value::Null).await?;
        Ok(resp.network_name)
    }

    pub async fn node_version(&self) -> Result<String, NodeClientError> {
        let resp: NodeVersionResponse = self.rpc.call("info.getNodeVersion", Value::Null).await?;
        Ok(resp.version)
    }

    pub async fn peers(&self) -> Result<Vec<Peer>, NodeClientError> {
        let resp: PeersResponse = self.rpc.call("info.peers", Value::Null).await?;
        Ok(resp.peers)
    }

    pub async fn tx_fee(&self) -> Result<TxFeeResponse, NodeClientError> {
        self.rpc.call("info.getTxFee", Value::Null).await
    }
}
