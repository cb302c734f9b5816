use serde::{Deserialize, Serialize};

/// Addresses entitled to the reward of a staking transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsOwner {
    /// Id of the staking transaction
    pub id: String,
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<RewardsOwnerAddress>,
    pub outputs: Vec<RewardsOwnerOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsOwnerAddress {
    pub id: String,
    pub address: String,
    pub index: u32,
}

/// Output ids the reward will be paid to once the staking period ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsOwnerOutput {
    pub id: String,
    pub transaction_id: String,
    pub index: u32,
}
