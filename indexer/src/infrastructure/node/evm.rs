use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::error::NodeClientError;
use super::rpc::RpcClient;
use super::types::{flat_calls_json, parse_hex_u64, CallFrame, EvmHeader, EvmReceiptResponse};
use crate::domain::models::{EvmLog, EvmReceipt, EvmTrace};
use crate::domain::ports::EvmSource;

/// Timeout handed to the node's tracer
const TRACER_TIMEOUT: &str = "180s";
/// Traces of heavy transactions can take a while
const TRACE_REQUEST_TIMEOUT: Duration = Duration::from_secs(200);

/// Client of the contract chain JSON-RPC API
#[derive(Debug, Clone)]
pub struct EvmClient {
    rpc: RpcClient,
}

impl EvmClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(client, format!("{}/ext/bc/C/rpc", base_url)),
        }
    }

    pub async fn latest_header(&self) -> Result<EvmHeader, NodeClientError> {
        let header: Option<EvmHeader> = self
            .rpc
            .call("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        header.ok_or_else(|| NodeClientError::NotFound("latest block".to_string()))
    }

    pub async fn transaction_receipt(&self, hash: &str) -> Result<EvmReceipt, NodeClientError> {
        let receipt: Option<EvmReceiptResponse> = self
            .rpc
            .call("eth_getTransactionReceipt", json!([hash]))
            .await?;
        let receipt =
            receipt.ok_or_else(|| NodeClientError::NotFound(format!("receipt of {}", hash)))?;
        Ok(map_receipt(receipt))
    }

    pub async fn trace_transaction(&self, hash: &str) -> Result<EvmTrace, NodeClientError> {
        let frame: CallFrame = self
            .rpc
            .call_with_timeout(
                "debug_traceTransaction",
                json!([hash, { "tracer": "callTracer", "timeout": TRACER_TIMEOUT }]),
                TRACE_REQUEST_TIMEOUT,
            )
            .await?;
        Ok(EvmTrace {
            id: hash.to_string(),
            data: flat_calls_json(&frame.flatten()),
            created_at: Utc::now(),
        })
    }
}

fn hex_or_zero(value: Option<&str>) -> u64 {
    value.and_then(parse_hex_u64).unwrap_or(0)
}

fn map_receipt(receipt: EvmReceiptResponse) -> EvmReceipt {
    let logs = receipt
        .logs
        .into_iter()
        .map(|log| EvmLog {
            index: hex_or_zero(log.log_index.as_deref()),
            tx_index: hex_or_zero(log.transaction_index.as_deref()),
            address: log.address,
            removed: log.removed,
            topics: log.topics,
            data: log.data,
        })
        .collect();

    EvmReceipt {
        id: receipt.transaction_hash,
        receipt_type: hex_or_zero(receipt.receipt_type.as_deref()) as u8,
        status: hex_or_zero(receipt.status.as_deref()),
        contract_address: receipt.contract_address.filter(|a| !a.is_empty()),
        logs,
    }
}

#[async_trait]
impl EvmSource for EvmClient {
    async fn latest_height(&self) -> Result<u64, NodeClientError> {
        let header = self.latest_header().await?;
        parse_hex_u64(&header.number).ok_or_else(|| {
            NodeClientError::ResponseError(format!("invalid block number {}", header.number))
        })
    }

    async fn receipt(&self, tx_hash: &str) -> Result<EvmReceipt, NodeClientError> {
        self.transaction_receipt(tx_hash).await
    }

    async fn trace(&self, tx_hash: &str) -> Result<EvmTrace, NodeClientError> {
        self.trace_transaction(tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipts_are_mapped() {
        let raw: EvmReceiptResponse = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "type": "0x2",
            "status": "0x1",
            "contractAddress": null,
            "logs": [{
                "address": "0xdead",
                "topics": ["0x01"],
                "data": "0x",
                "logIndex": "0x3",
                "transactionIndex": "0x1",
                "removed": false
            }]
        }))
        .unwrap();
        let receipt = map_receipt(raw);
        assert_eq!(receipt.id, "0xabc");
        assert_eq!(receipt.receipt_type, 2);
        assert_eq!(receipt.status, 1);
        assert!(receipt.contract_address.is_none());
        assert_eq!(receipt.logs[0].index, 3);
        assert_eq!(receipt.logs[0].tx_index, 1);
    }
}
