// Minimal JSON-RPC client for the node queries served by the API

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Node request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Node returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid node response: {0}")]
    Response(String),
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeVersion {
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkName {
    network_name: String,
}

#[derive(Debug, Deserialize)]
struct StakeReply {
    #[serde(default)]
    staked: Value,
}

#[derive(Debug, Deserialize)]
struct AllBalances {
    #[serde(default)]
    balances: Value,
}

/// Node client shared by all request handlers
#[derive(Debug, Clone)]
pub struct NodeClient {
    client: Client,
    endpoint: String,
}

impl NodeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, NodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.rpc_endpoint.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        method: &str,
        params: Value,
    ) -> Result<T, NodeError> {
        let url = format!("{}{}", self.endpoint, path);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: RpcResponse = self.client.post(&url).json(&body).send().await?.json().await?;
        if let Some(error) = response.error {
            return Err(NodeError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        let result = response
            .result
            .ok_or_else(|| NodeError::Response(format!("{} returned no result", method)))?;
        serde_json::from_value(result).map_err(|e| NodeError::Response(e.to_string()))
    }

    pub async fn node_version(&self) -> Result<String, NodeError> {
        let reply: NodeVersion = self.call("/ext/info", "info.getNodeVersion", json!({})).await?;
        Ok(reply.version)
    }

    pub async fn network_name(&self) -> Result<String, NodeError> {
        let reply: NetworkName = self.call("/ext/info", "info.getNetworkName", json!({})).await?;
        Ok(reply.network_name)
    }

    /// Platform balance reply as returned by the node
    pub async fn platform_balance(&self, address: &str) -> Result<Value, NodeError> {
        self.call("/ext/P", "platform.getBalance", json!({ "address": address }))
            .await
    }

    pub async fn platform_stake(&self, address: &str) -> Result<Value, NodeError> {
        let reply: StakeReply = self
            .call("/ext/P", "platform.getStake", json!({ "addresses": [address] }))
            .await?;
        Ok(reply.staked)
    }

    pub async fn exchange_balances(&self, address: &str) -> Result<Value, NodeError> {
        let reply: AllBalances = self
            .call("/ext/bc/X", "avm.getAllBalances", json!({ "address": address }))
            .await?;
        Ok(reply.balances)
    }

    /// Contract chain balance in wei as a decimal string
    pub async fn evm_balance(&self, address: &str, height: Option<u64>) -> Result<String, NodeError> {
        let block = height
            .map(|h| format!("{:#x}", h))
            .unwrap_or_else(|| "latest".to_string());
        let hex: String = self
            .call("/ext/bc/C/rpc", "eth_getBalance", json!([address, block]))
            .await?;
        hex_to_decimal(&hex)
    }
}

fn hex_to_decimal(hex: &str) -> Result<String, NodeError> {
    let digits = hex.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok("0".to_string());
    }
    u128::from_str_radix(digits, 16)
        .map(|v| v.to_string())
        .map_err(|e| NodeError::Response(format!("invalid balance {}: {}", hex, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_hex_balances() {
        assert_eq!(hex_to_decimal("0x0").unwrap(), "0");
        assert_eq!(hex_to_decimal("0x").unwrap(), "0");
        assert_eq!(
            hex_to_decimal("0xde0b6b3a7640000").unwrap(),
            "1000000000000000000"
        );
        assert!(hex_to_decimal("0xzz").is_err());
    }
}
