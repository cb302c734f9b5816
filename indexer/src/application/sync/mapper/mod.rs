//! Turn raw containers of each chain into domain records.

pub mod c_chain;
pub mod p_chain;
mod shared;
pub mod x_chain;

use crate::domain::errors::DecodeError;
use crate::domain::models::{Asset, Block, Chain, RewardsOwner, Transaction};
use crate::domain::ports::RawContainer;
use crate::infrastructure::codec::AddressFormatter;

pub use c_chain::CChainMapper;
pub use p_chain::PChainMapper;
pub use x_chain::XChainMapper;

/// Everything one container decodes into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedContainer {
    pub block: Option<Block>,
    pub transactions: Vec<Transaction>,
    pub assets: Vec<Asset>,
    pub chains: Vec<Chain>,
    pub rewards_owners: Vec<RewardsOwner>,
}

/// Decoder of one chain's containers
pub trait ContainerDecoder: Send + Sync {
    /// Blockchain id the decoded records are tagged with
    fn chain(&self) -> &str;

    fn decode(&self, container: &RawContainer) -> Result<DecodedContainer, DecodeError>;
}

/// Settings shared by the decoders of one network
#[derive(Debug, Clone)]
pub struct MapperContext {
    /// Blockchain id of the chain being decoded
    pub chain_id: String,
    pub network_id: u32,
    /// Asset the fee is paid in
    pub native_asset: String,
    pub addresses: AddressFormatter,
}

impl MapperContext {
    pub fn new(
        chain_id: impl Into<String>,
        network_id: u32,
        native_asset: impl Into<String>,
        hrp: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            chain_id: chain_id.into(),
            network_id,
            native_asset: native_asset.into(),
            addresses: AddressFormatter::new(hrp)?,
        })
    }
}
