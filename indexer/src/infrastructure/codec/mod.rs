//! Wire formats of the exchange, platform and contract chains.

pub mod atomic;
pub mod avm;
pub mod components;
pub mod config;
pub mod evm_block;
pub mod ids;
pub mod pvm;
pub mod reader;

#[cfg(test)]
pub(crate) mod test_bytes;

pub use config::{CodecConfig, TypeTag};
pub use ids::{hex_checksum_decode, AddressFormatter, Id, ShortId};

/// Codec configurations for every chain, built once at startup
#[derive(Debug, Clone)]
pub struct Codecs {
    pub avm: CodecConfig,
    pub pvm: CodecConfig,
    pub atomic: CodecConfig,
}

impl Codecs {
    pub fn new() -> Self {
        Self {
            avm: CodecConfig::avm(),
            pvm: CodecConfig::pvm(),
            atomic: CodecConfig::atomic(),
        }
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new()
    }
}
