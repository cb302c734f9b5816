//! Clients of the Avalanche node APIs

mod error;
pub mod evm;
pub mod index;
pub mod info;
pub mod platform;
mod rpc;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;

pub use error::NodeClientError;
pub use evm::EvmClient;
pub use index::{IndexClient, IndexedChain};
pub use info::InfoClient;
pub use platform::PlatformClient;
pub use rpc::RpcClient;

use crate::config::NodeConfig;
use crate::domain::ports::NetworkSource;
use types::{Blockchain, MinStakeResponse, Peer, TxFeeResponse, ValidatorsResponse};

/// Every API of one node, sharing a single HTTP client
#[derive(Debug, Clone)]
pub struct NodeClient {
    pub info: InfoClient,
    pub platform: PlatformClient,
    pub evm: EvmClient,
    pub x_index: IndexClient,
    pub p_index: IndexClient,
    pub c_index: IndexClient,
}

impl NodeClient {
    pub fn new(config: &NodeConfig) -> Result<Self, NodeClientError> {
        let http = RpcClient::http_client(Duration::from_secs(config.timeout_secs))?;
        let base = config.rpc_endpoint.as_str();

        Ok(Self {
            info: InfoClient::new(http.clone(), base),
            platform: PlatformClient::new(http.clone(), base),
            evm: EvmClient::new(http.clone(), base),
            x_index: IndexClient::new(http.clone(), base, IndexedChain::X),
            p_index: IndexClient::new(http.clone(), base, IndexedChain::P),
            c_index: IndexClient::new(http, base, IndexedChain::C),
        })
    }

    pub fn index(&self, chain: IndexedChain) -> &IndexClient {
        match chain {
            IndexedChain::X => &self.x_index,
            IndexedChain::P => &self.p_index,
            IndexedChain::C => &self.c_index,
        }
    }
}

#[async_trait]
impl NetworkSource for NodeClient {
    async fn network_name(&self) -> Result<String, NodeClientError> {
        self.info.network_name().await
    }

    async fn node_version(&self) -> Result<String, NodeClientError> {
        self.info.node_version().await
    }

    async fn current_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        self.platform.current_validators().await
    }

    async fn pending_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        self.platform.pending_validators().await
    }

    async fn current_height(&self) -> Result<u64, NodeClientError> {
        self.platform.current_height().await
    }

    async fn min_stake(&self) -> Result<MinStakeResponse, NodeClientError> {
        self.platform.min_stake().await
    }

    async fn blockchains(&self) -> Result<Vec<Blockchain>, NodeClientError> {
        self.platform.blockchains().await
    }

    async fn peers(&self) -> Result<Vec<Peer>, NodeClientError> {
        self.info.peers().await
    }

    async fn tx_fee(&self) -> Result<TxFeeResponse, NodeClientError> {
        self.info.tx_fee().await
    }
}
