use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of a primary network validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub node_id: String,
    pub stake_amount: i64,
    pub stake_percent: f64,
    pub potential_reward: i64,
    pub reward_address: String,
    pub active: bool,
    pub active_start_time: DateTime<Utc>,
    pub active_end_time: DateTime<Utc>,
    pub active_progress_percent: f64,
    pub uptime: f64,
    pub delegations_count: i32,
    pub delegations_percent: f64,
    pub delegated_amount: i64,
    pub delegated_amount_percent: f64,
    pub delegation_fee: f64,
    pub capacity: i64,
    pub capacity_percent: f64,
    pub first_height: i64,
    pub last_height: i64,
}

/// Point-in-time sample of a validator, aggregated into stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSeq {
    pub time: DateTime<Utc>,
    pub height: i64,
    pub node_id: String,
    pub stake_amount: i64,
    pub stake_percent: f64,
    pub potential_reward: i64,
    pub reward_address: String,
    pub active: bool,
    pub active_start_time: DateTime<Utc>,
    pub active_end_time: DateTime<Utc>,
    pub active_progress_percent: f64,
    pub delegations_count: i32,
    pub delegations_percent: f64,
    pub delegated_amount: i64,
    pub delegated_amount_percent: f64,
    pub delegation_fee: f64,
    pub uptime: f64,
}

impl From<&Validator> for ValidatorSeq {
    fn from(v: &Validator) -> Self {
        Self {
            time: Utc::now(),
            height: v.last_height,
            node_id: v.node_id.clone(),
            stake_amount: v.stake_amount,
            stake_percent: v.stake_percent,
            potential_reward: v.potential_reward,
            reward_address: v.reward_address.clone(),
            active: true,
            active_start_time: v.active_start_time,
            active_end_time: v.active_end_time,
            active_progress_percent: v.active_progress_percent,
            delegations_count: v.delegations_count,
            delegations_percent: v.delegations_percent,
            delegated_amount: v.delegated_amount,
            delegated_amount_percent: v.delegated_amount_percent,
            delegation_fee: v.delegation_fee,
            uptime: v.uptime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorStat {
    pub time: DateTime<Utc>,
    pub bucket: String,
    pub node_id: String,
    pub uptime_min: f64,
    pub uptime_max: f64,
    pub uptime_avg: f64,
    pub stake_amount: i64,
    pub stake_percent: f64,
    pub delegations_count: i32,
    pub delegations_percent: f64,
    pub delegated_amount: i64,
    pub delegated_amount_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// sha1 of node id, reward address, start and end; the node exposes no delegation id
    pub reference_id: String,
    pub node_id: String,
    pub stake_amount: i64,
    pub potential_reward: i64,
    pub reward_address: String,
    pub active: bool,
    pub active_start_time: DateTime<Utc>,
    pub active_end_time: DateTime<Utc>,
    pub first_height: i64,
    pub last_height: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetric {
    pub time: DateTime<Utc>,
    pub height: i64,
    pub peers_count: i32,
    pub blockchains_count: i32,
    pub active_validators_count: i32,
    pub pending_validators_count: i32,
    pub active_delegations_count: i32,
    pub pending_delegations_count: i32,
    pub min_validator_stake: i64,
    pub min_delegation_stake: i64,
    pub tx_fee: i64,
    pub creation_tx_fee: i64,
    pub uptime: f64,
    pub delegation_fee: f64,
    pub total_staked: i64,
    pub total_delegated: i64,
}

/// Known reward address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Share of `part` in `total`, in percent. Zero when the total is zero.
pub fn percent_of(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

#[cfg(test)]
mod tests {
    use super::percent_of;

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent_of(5, 0), 0.0);
        assert_eq!(percent_of(25, 100), 25.0);
        assert_eq!(percent_of(1, 4), 25.0);
    }
}
