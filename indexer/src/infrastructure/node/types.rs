//! Response payloads of the node APIs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One container as returned by the index API
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerResponse {
    pub id: String,
    /// Decimal string
    pub index: String,
    /// `0x` hex with checksum
    pub bytes: String,
    #[serde(default)]
    pub encoding: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainersResponse {
    #[serde(default)]
    pub containers: Vec<ContainerResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardOwner {
    #[serde(default)]
    pub locktime: String,
    #[serde(default)]
    pub threshold: String,
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegator {
    #[serde(rename = "txID", default)]
    pub tx_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    /// Older nodes report `stakeAmount`, newer ones `weight`
    #[serde(default, alias = "weight")]
    pub stake_amount: String,
    #[serde(rename = "nodeID", default)]
    pub node_id: String,
    #[serde(default)]
    pub reward_owner: Option<RewardOwner>,
    #[serde(default)]
    pub potential_reward: String,
}

impl Delegator {
    pub fn reward_address(&self) -> String {
        self.reward_owner
            .as_ref()
            .and_then(|o| o.addresses.first().cloned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    #[serde(rename = "txID", default)]
    pub tx_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, alias = "weight")]
    pub stake_amount: String,
    #[serde(rename = "nodeID", default)]
    pub node_id: String,
    #[serde(default, alias = "validationRewardOwner")]
    pub reward_owner: Option<RewardOwner>,
    #[serde(default)]
    pub potential_reward: String,
    #[serde(default)]
    pub delegation_fee: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub delegators: Option<Vec<Delegator>>,
}

impl Validator {
    pub fn reward_address(&self) -> String {
        self.reward_owner
            .as_ref()
            .and_then(|o| o.addresses.first().cloned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorsResponse {
    #[serde(default)]
    pub validators: Vec<Validator>,
    #[serde(default)]
    pub delegators: Vec<Delegator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinStakeResponse {
    #[serde(default)]
    pub min_validator_stake: String,
    #[serde(default)]
    pub min_delegator_stake: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxFeeResponse {
    #[serde(default)]
    pub creation_tx_fee: String,
    #[serde(default)]
    pub tx_fee: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub unlocked: String,
    #[serde(default)]
    pub locked_stakeable: String,
    #[serde(default)]
    pub locked_not_stakeable: String,
    #[serde(default)]
    pub staked: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blockchain {
    pub id: String,
    #[serde(rename = "subnetID", default)]
    pub subnet_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vm_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockchainsResponse {
    #[serde(default)]
    pub blockchains: Vec<Blockchain>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    #[serde(rename = "nodeID", default)]
    pub node_id: String,
    #[serde(default)]
    pub ip: String,
    #[serde(rename = "publicIP", default)]
    pub public_ip: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_sent: String,
    #[serde(default)]
    pub last_received: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeersResponse {
    #[serde(default)]
    pub peers: Vec<Peer>,
}

/// Header fields of `eth_getBlockByNumber`, quantities in hex
#[derive(Debug, Clone, Deserialize)]
pub struct EvmHeader {
    pub hash: String,
    pub number: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmLogResponse {
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub log_index: Option<String>,
    #[serde(default)]
    pub transaction_index: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReceiptResponse {
    pub transaction_hash: String,
    #[serde(rename = "type", default)]
    pub receipt_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub logs: Vec<EvmLogResponse>,
}

/// One frame of the built-in call tracer output
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    #[serde(rename = "type", default)]
    pub call_type: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub calls: Vec<CallFrame>,
}

/// A call frame without its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatCall {
    #[serde(rename = "type")]
    pub call_type: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas: String,
    pub gas_used: String,
    pub revert: bool,
    pub error: String,
}

impl CallFrame {
    /// Depth-first list of every frame. Children of a reverted frame are
    /// reverted too and inherit its error when they carry none.
    pub fn flatten(&self) -> Vec<FlatCall> {
        let mut out = Vec::new();
        self.flatten_into(false, "", &mut out);
        out
    }

    fn flatten_into(&self, parent_reverted: bool, parent_error: &str, out: &mut Vec<FlatCall>) {
        let own_error = self.error.clone().unwrap_or_default();
        let revert = parent_reverted || !own_error.is_empty();
        let error = if own_error.is_empty() && parent_reverted {
            parent_error.to_string()
        } else {
            own_error
        };

        out.push(FlatCall {
            call_type: self.call_type.clone(),
            from: self.from.clone(),
            to: self.to.clone().unwrap_or_default(),
            value: hex_quantity_string(self.value.as_deref()),
            gas: hex_quantity_string(self.gas.as_deref()),
            gas_used: hex_quantity_string(self.gas_used.as_deref()),
            revert,
            error: error.clone(),
        });

        for child in &self.calls {
            child.flatten_into(revert, &error, out);
        }
    }
}

/// Parse a `0x` hex quantity
pub fn parse_hex_u64(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Decimal rendering of a hex quantity, `0` when absent or too large
fn hex_quantity_string(value: Option<&str>) -> String {
    match value {
        Some(v) => {
            let digits = v.strip_prefix("0x").unwrap_or(v);
            u128::from_str_radix(if digits.is_empty() { "0" } else { digits }, 16)
                .map(|n| n.to_string())
                .unwrap_or_else(|_| "0".to_string())
        }
        None => "0".to_string(),
    }
}

/// Raw JSON of a trace, as stored
pub fn flat_calls_json(calls: &[FlatCall]) -> Value {
    serde_json::to_value(calls).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validators_accept_weight_alias() {
        let resp: ValidatorsResponse = serde_json::from_value(json!({
            "validators": [{
                "txID": "tx",
                "startTime": "1600000000",
                "endTime": "1700000000",
                "weight": "2000000000000",
                "nodeID": "NodeID-abc",
                "rewardOwner": {"locktime": "0", "threshold": "1", "addresses": ["P-avax1xyz"]},
                "potentialReward": "10",
                "delegationFee": "2.0000",
                "uptime": "0.9900",
                "connected": true
            }]
        }))
        .unwrap();
        let v = &resp.validators[0];
        assert_eq!(v.stake_amount, "2000000000000");
        assert_eq!(v.reward_address(), "P-avax1xyz");
        assert!(v.delegators.is_none());
    }

    #[test]
    fn reverted_frames_propagate_to_children() {
        let frame: CallFrame = serde_json::from_value(json!({
            "type": "CALL",
            "from": "0x1",
            "to": "0x2",
            "value": "0x10",
            "gas": "0x5208",
            "gasUsed": "0x5208",
            "error": "execution reverted",
            "calls": [{"type": "STATICCALL", "from": "0x2", "to": "0x3"}]
        }))
        .unwrap();
        let flat = frame.flatten();
        assert_eq!(flat.len(), 2);
        assert!(flat[0].revert);
        assert_eq!(flat[0].value, "16");
        assert!(flat[1].revert);
        assert_eq!(flat[1].error, "execution reverted");
        assert_eq!(flat[1].value, "0");
    }

    #[test]
    fn hex_quantities_parse() {
        assert_eq!(parse_hex_u64("0x1a"), Some(26));
        assert_eq!(parse_hex_u64("0x"), Some(0));
        assert_eq!(parse_hex_u64("zz"), None);
    }
}
