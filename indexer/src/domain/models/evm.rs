use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call trace of an EVM transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmTrace {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// Receipt of an EVM transaction with its logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmReceipt {
    pub id: String,
    #[serde(rename = "type")]
    pub receipt_type: u8,
    pub status: u64,
    pub contract_address: Option<String>,
    pub logs: Vec<EvmLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmLog {
    pub index: u64,
    pub tx_index: u64,
    pub address: String,
    pub removed: bool,
    pub topics: Vec<String>,
    pub data: String,
}
