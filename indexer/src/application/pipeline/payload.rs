use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::models::{Delegation, NetworkMetric, Validator, ValidatorSeq};
use crate::infrastructure::node::types::{
    Blockchain, Delegator, MinStakeResponse, Peer, TxFeeResponse, Validator as NodeValidator,
};

/// State handed from stage to stage during one pipeline run
#[derive(Debug, Clone, Default)]
pub struct MetricsPayload {
    pub sync_time: DateTime<Utc>,

    // fetched
    pub network_name: String,
    pub node_version: String,
    pub height: i64,
    pub peers: Vec<Peer>,
    pub blockchains: Vec<Blockchain>,
    pub current_validators: Vec<NodeValidator>,
    pub current_delegators: Vec<Delegator>,
    pub pending_validators: Vec<NodeValidator>,
    pub pending_delegators: Vec<Delegator>,
    pub min_stake: MinStakeResponse,
    pub raw_tx_fee: TxFeeResponse,

    // calculated
    pub active_stake_amount: i64,
    pub active_validator_share: HashMap<String, f64>,
    pub min_validator_stake: i64,
    pub min_delegator_stake: i64,
    pub tx_fee: i64,
    pub creation_tx_fee: i64,

    // mapped
    pub validators: Vec<Validator>,
    pub validator_seqs: Vec<ValidatorSeq>,
    pub delegations: Vec<Delegation>,
    pub network_metric: Option<NetworkMetric>,
}

impl MetricsPayload {
    pub fn new(sync_time: DateTime<Utc>) -> Self {
        Self {
            sync_time,
            ..Default::default()
        }
    }

    /// Every reward address of the current validators and delegators, first seen first
    pub fn reward_addresses(&self) -> Vec<String> {
        let validators = self
            .current_validators
            .iter()
            .filter_map(|v| v.reward_owner.as_ref());
        let delegators = self
            .current_validators
            .iter()
            .flat_map(|v| v.delegators.iter().flatten())
            .chain(self.current_delegators.iter())
            .filter_map(|d| d.reward_owner.as_ref());

        let mut seen = std::collections::HashSet::new();
        validators
            .chain(delegators)
            .flat_map(|owner| owner.addresses.iter())
            .filter(|addr| seen.insert(addr.as_str()))
            .cloned()
            .collect()
    }
}
