use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::types::{OutputType, TxStatus, TxType};

/// A UTXO, either created by a transaction or referenced as one of its inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub id: String,
    pub tx_id: String,
    pub chain: String,
    pub asset: String,
    #[serde(rename = "type")]
    pub output_type: Option<OutputType>,
    pub index: u64,
    pub locktime: u64,
    pub threshold: u32,
    pub amount: u64,
    pub group: u32,
    pub addresses: Vec<String>,
    pub stake: bool,
    pub reward: bool,
    pub spent: bool,
    pub spent_tx_id: Option<String>,
    pub payload: Option<String>,
}

impl Output {
    pub fn new(id: impl Into<String>, tx_id: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tx_id: tx_id.into(),
            chain: String::new(),
            asset: asset.into(),
            output_type: None,
            index: 0,
            locktime: 0,
            threshold: 0,
            amount: 0,
            group: 0,
            addresses: Vec::new(),
            stake: false,
            reward: false,
            spent: false,
            spent_tx_id: None,
            payload: None,
        }
    }
}

/// A normalized transaction from any of the three chains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub reference_tx_id: Option<String>,
    pub chain: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub block: Option<String>,
    pub block_height: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub status: TxStatus,
    pub memo: Option<String>,
    pub memo_text: Option<String>,
    pub nonce: Option<u64>,
    pub fee: u64,
    pub source_chain: Option<String>,
    pub destination_chain: Option<String>,
    pub metadata: Map<String, Value>,
    pub inputs: Vec<Output>,
    pub outputs: Vec<Output>,
    pub input_amounts: BTreeMap<String, u64>,
    pub output_amounts: BTreeMap<String, u64>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, tx_type: TxType) -> Self {
        Self {
            id: id.into(),
            reference_tx_id: None,
            chain: String::new(),
            tx_type,
            block: None,
            block_height: None,
            timestamp: DateTime::<Utc>::default(),
            status: TxStatus::Accepted,
            memo: None,
            memo_text: None,
            nonce: None,
            fee: 0,
            source_chain: None,
            destination_chain: None,
            metadata: Map::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_amounts: BTreeMap::new(),
            output_amounts: BTreeMap::new(),
        }
    }

    pub fn uses_utxos(&self) -> bool {
        self.tx_type.uses_utxos()
    }

    /// Store the raw memo as base64 plus a readable text form.
    /// Empty memos are left unset.
    pub fn set_raw_memo(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.memo = Some(base64::engine::general_purpose::STANDARD.encode(data));
        self.memo_text = Some(memo_text(data));
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Aggregate amounts per asset and derive the fee paid in `native_asset`.
    /// The fee is floored at zero when outputs exceed inputs.
    pub fn update_totals(&mut self, native_asset: &str) {
        self.input_amounts.clear();
        self.output_amounts.clear();

        let mut total_in: u64 = 0;
        let mut total_out: u64 = 0;

        for input in &self.inputs {
            let entry = self.input_amounts.entry(input.asset.clone()).or_insert(0);
            *entry = entry.saturating_add(input.amount);
            if input.asset == native_asset {
                total_in = total_in.saturating_add(input.amount);
            }
        }

        for output in &self.outputs {
            let entry = self.output_amounts.entry(output.asset.clone()).or_insert(0);
            *entry = entry.saturating_add(output.amount);
            if output.asset == native_asset {
                total_out = total_out.saturating_add(output.amount);
            }
        }

        self.fee = total_in.saturating_sub(total_out);
    }

    /// Ids of the UTXOs this transaction consumes. Account debits of atomic
    /// exports are inputs owned by the transaction itself and spend nothing.
    pub fn spent_output_ids(&self) -> Vec<String> {
        self.inputs
            .iter()
            .filter(|i| i.tx_id != self.id)
            .map(|i| i.id.clone())
            .collect()
    }
}

/// NUL bytes removed, invalid UTF-8 sequences dropped
pub fn memo_text(data: &[u8]) -> String {
    let cleaned: Vec<u8> = data.iter().copied().filter(|b| *b != 0).collect();
    String::from_utf8_lossy(&cleaned).replace('\u{FFFD}', "")
}

/// Per-type transaction totals for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTypeCount {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVAX: &str = "avax-asset";

    fn utxo(asset: &str, amount: u64) -> Output {
        let mut out = Output::new("o", "t", asset);
        out.amount = amount;
        out
    }

    #[test]
    fn fee_is_native_difference() {
        let mut tx = Transaction::new("tx", TxType::XBase);
        tx.inputs = vec![utxo(AVAX, 1_000), utxo("other", 50)];
        tx.outputs = vec![utxo(AVAX, 900), utxo("other", 50)];
        tx.update_totals(AVAX);
        assert_eq!(tx.fee, 100);
        assert_eq!(tx.input_amounts.get("other"), Some(&50));
        assert_eq!(tx.output_amounts.get(AVAX), Some(&900));
    }

    #[test]
    fn fee_floors_at_zero() {
        let mut tx = Transaction::new("tx", TxType::PImport);
        tx.inputs = vec![utxo(AVAX, 10)];
        tx.outputs = vec![utxo(AVAX, 25)];
        tx.update_totals(AVAX);
        assert_eq!(tx.fee, 0);
    }

    #[test]
    fn update_totals_is_repeatable() {
        let mut tx = Transaction::new("tx", TxType::XBase);
        tx.inputs = vec![utxo(AVAX, 10)];
        tx.update_totals(AVAX);
        tx.update_totals(AVAX);
        assert_eq!(tx.input_amounts.get(AVAX), Some(&10));
    }

    #[test]
    fn own_inputs_spend_nothing() {
        let mut tx = Transaction::new("tx", TxType::CAtomicExport);
        tx.inputs = vec![Output::new("debit", "tx", AVAX), Output::new("utxo", "earlier", AVAX)];
        assert_eq!(tx.spent_output_ids(), vec!["utxo".to_string()]);
    }

    #[test]
    fn memo_text_strips_nul_and_invalid_utf8() {
        assert_eq!(memo_text(b"he\0llo"), "hello");
        assert_eq!(memo_text(&[b'o', b'k', 0xff, 0xfe]), "ok");

        let mut tx = Transaction::new("tx", TxType::XBase);
        tx.set_raw_memo(b"");
        assert!(tx.memo.is_none());
        tx.set_raw_memo(b"hi");
        assert_eq!(tx.memo.as_deref(), Some("aGk="));
        assert_eq!(tx.memo_text.as_deref(), Some("hi"));
    }
}
