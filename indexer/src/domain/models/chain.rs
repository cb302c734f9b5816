use serde::{Deserialize, Serialize};

/// A blockchain known to the platform chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: String,
    pub name: String,
    pub vm: String,
    pub network: u32,
    pub subnet: String,
}
