use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::error::NodeClientError;
use super::rpc::RpcClient;
use super::types::{ContainerResponse, ContainersResponse};
use crate::domain::ports::{ContainerSource, RawContainer, Tip};
use crate::infrastructure::codec::hex_checksum_decode;

/// Chains exposing an index API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexedChain {
    X,
    P,
    C,
}

impl IndexedChain {
    pub fn alias(&self) -> &'static str {
        match self {
            IndexedChain::X => "X",
            IndexedChain::P => "P",
            IndexedChain::C => "C",
        }
    }

    /// The exchange chain indexes transactions, the others blocks
    fn container_kind(&self) -> &'static str {
        match self {
            IndexedChain::X => "tx",
            IndexedChain::P | IndexedChain::C => "block",
        }
    }

    /// Index API path relative to the node base url
    pub fn index_path(&self) -> String {
        format!("/ext/index/{}/{}", self.alias(), self.container_kind())
    }
}

#[derive(Debug, Deserialize)]
struct LastAcceptedResponse {
    index: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Client of the index API of one chain
#[derive(Debug, Clone)]
pub struct IndexClient {
    rpc: RpcClient,
    chain: IndexedChain,
}

impl IndexClient {
    pub fn new(client: Client, base_url: &str, chain: IndexedChain) -> Self {
        let endpoint = format!("{}{}", base_url, chain.index_path());
        Self {
            rpc: RpcClient::new(client, endpoint),
            chain,
        }
    }

    pub fn chain(&self) -> IndexedChain {
        self.chain
    }

    pub async fn get_last_accepted(&self) -> Result<Tip, NodeClientError> {
        let resp: LastAcceptedResponse = self
            .rpc
            .call("index.getLastAccepted", json!({ "encoding": "cb58" }))
            .await?;
        Ok(Tip {
            index: parse_index(&resp.index)?,
            time: resp.timestamp,
        })
    }

    pub async fn get_container_range(
        &self,
        start_index: u64,
        num_to_fetch: u64,
    ) -> Result<Vec<RawContainer>, NodeClientError> {
        let resp: ContainersResponse = self
            .rpc
            .call(
                "index.getContainerRange",
                json!({
                    "encoding": "hex",
                    "startIndex": start_index,
                    "numToFetch": num_to_fetch,
                }),
            )
            .await?;

        resp.containers.into_iter().map(into_raw_container).collect()
    }
}

fn parse_index(value: &str) -> Result<u64, NodeClientError> {
    value
        .parse::<u64>()
        .map_err(|e| NodeClientError::ResponseError(format!("invalid index {}: {}", value, e)))
}

fn into_raw_container(container: ContainerResponse) -> Result<RawContainer, NodeClientError> {
    let bytes = hex_checksum_decode(&container.bytes).map_err(|e| {
        NodeClientError::ResponseError(format!("container {}: {}", container.id, e))
    })?;
    Ok(RawContainer {
        index: parse_index(&container.index)?,
        id: container.id,
        bytes,
        timestamp: container.timestamp,
    })
}

#[async_trait]
impl ContainerSource for IndexClient {
    async fn last_accepted(&self) -> Result<Tip, NodeClientError> {
        self.get_last_accepted().await
    }

    async fn container_range(
        &self,
        start: u64,
        count: u64,
    ) -> Result<Vec<RawContainer>, NodeClientError> {
        self.get_container_range(start, count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_container_kind() {
        assert_eq!(IndexedChain::X.index_path(), "/ext/index/X/tx");
        assert_eq!(IndexedChain::P.index_path(), "/ext/index/P/block");
        assert_eq!(IndexedChain::C.index_path(), "/ext/index/C/block");
    }

    #[test]
    fn container_bytes_are_checked() {
        let container: ContainerResponse = serde_json::from_value(json!({
            "id": "abc",
            "index": "7",
            "bytes": "0x00",
            "encoding": "hex",
            "timestamp": "2021-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(into_raw_container(container).is_err());
    }
}
