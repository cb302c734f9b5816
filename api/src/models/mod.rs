// API request/response models

mod search;

pub use search::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::entity::{
    assets, delegations, evm_receipts, transaction_outputs, transactions, validator_stats,
    validators,
};

/// One entry of the endpoint listing served at `/`
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub app_name: &'static str,
    pub app_version: &'static str,
    pub sync_status: String,
    pub sync_time: Option<DateTime<Utc>>,
    pub node_version: String,
    pub network_name: String,
}

#[derive(Debug, Serialize)]
pub struct ValidatorResponse {
    pub validator: validators::Model,
    pub delegations: Vec<delegations::Model>,
    pub stats_24h: Vec<validator_stats::Model>,
    pub stats_30d: Vec<validator_stats::Model>,
}

/// Asset with the number of transactions that moved it
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    #[serde(flatten)]
    pub asset: assets::Model,
    pub transactions_count: Option<i64>,
}

/// Transaction with its consumed and created outputs
#[derive(Debug, Serialize)]
pub struct TransactionData {
    #[serde(flatten)]
    pub transaction: transactions::Model,
    pub inputs: Vec<transaction_outputs::Model>,
    pub outputs: Vec<transaction_outputs::Model>,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub total_count: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct TxTraceResponse {
    pub receipt: Option<evm_receipts::Model>,
    pub logs: Vec<Value>,
    pub trace: Option<Value>,
}

/// Contract chain balance, optionally at a given height
#[derive(Debug, Serialize)]
pub struct EvmBalanceResponse {
    pub balance: String,
    pub height: Option<u64>,
}

/// Balances of a bare address on both UTXO chains
#[derive(Debug, Serialize)]
pub struct AddressBalancesResponse {
    #[serde(rename = "P")]
    pub platform: Value,
    #[serde(rename = "X")]
    pub exchange: Value,
}
