//! RLP decoding of contract chain blocks.
//!
//! A block is `[header, transactions, uncles, version, ext_data]`. Only the
//! header fields the indexer stores are decoded; the block hash is the
//! keccak256 of the raw header encoding.

use alloy_consensus::transaction::SignerRecoverable;
use alloy_consensus::{Transaction as _, TxEnvelope};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Header};

use crate::domain::errors::DecodeError;

/// An EVM transaction with the fields the indexer keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTx {
    pub hash: B256,
    pub sender: Address,
    pub receiver: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas: u64,
    pub gas_price: u128,
}

impl EvmTx {
    /// Maximum amount the sender can be charged
    pub fn cost(&self) -> U256 {
        U256::from(self.gas) * U256::from(self.gas_price) + self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmBlock {
    pub hash: B256,
    pub parent_hash: B256,
    pub number: u64,
    pub timestamp: u64,
    pub transactions: Vec<EvmTx>,
    pub ext_data: Vec<u8>,
}

fn rlp_err(e: alloy_rlp::Error) -> DecodeError {
    DecodeError::Malformed(format!("rlp: {}", e))
}

/// Strip a list header, returning the payload and advancing `buf` past it
fn list_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let header = Header::decode(buf).map_err(rlp_err)?;
    if !header.list {
        return Err(DecodeError::Malformed("expected rlp list".to_string()));
    }
    if buf.len() < header.payload_length {
        return Err(DecodeError::UnexpectedEof {
            needed: header.payload_length,
            remaining: buf.len(),
        });
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

fn decode_field<T: Decodable>(buf: &mut &[u8]) -> Result<T, DecodeError> {
    T::decode(buf).map_err(rlp_err)
}

fn decode_tx(tx: TxEnvelope) -> Result<EvmTx, DecodeError> {
    let sender = tx
        .recover_signer()
        .map_err(|e| DecodeError::Malformed(format!("signer recovery failed: {}", e)))?;

    Ok(EvmTx {
        hash: *tx.tx_hash(),
        sender,
        receiver: tx.to(),
        nonce: tx.nonce(),
        value: tx.value(),
        gas: tx.gas_limit(),
        gas_price: tx.gas_price().unwrap_or_else(|| tx.max_fee_per_gas()),
    })
}

/// Decode a full contract chain block
pub fn decode_block(raw: &[u8]) -> Result<EvmBlock, DecodeError> {
    let mut buf = raw;
    let mut block = list_payload(&mut buf)?;
    if !buf.is_empty() {
        return Err(DecodeError::TrailingBytes(buf.len()));
    }

    let header_start = block;
    let mut header = list_payload(&mut block)?;
    let header_raw = &header_start[..header_start.len() - block.len()];
    let hash = keccak256(header_raw);

    let parent_hash: B256 = decode_field(&mut header)?;
    let _uncle_hash: B256 = decode_field(&mut header)?;
    let _coinbase: Address = decode_field(&mut header)?;
    let _state_root: B256 = decode_field(&mut header)?;
    let _tx_root: B256 = decode_field(&mut header)?;
    let _receipt_root: B256 = decode_field(&mut header)?;
    let _bloom: Bytes = decode_field(&mut header)?;
    let _difficulty: U256 = decode_field(&mut header)?;
    let number: u64 = decode_field(&mut header)?;
    let _gas_limit: u64 = decode_field(&mut header)?;
    let _gas_used: u64 = decode_field(&mut header)?;
    let timestamp: u64 = decode_field(&mut header)?;

    let envelopes: Vec<TxEnvelope> = decode_field(&mut block)?;
    let transactions = envelopes
        .into_iter()
        .map(decode_tx)
        .collect::<Result<Vec<_>, _>>()?;

    let _uncles = list_payload(&mut block)?;
    let _version: u32 = decode_field(&mut block)?;
    let ext_data: Bytes = if block.is_empty() {
        Bytes::new()
    } else {
        decode_field(&mut block)?
    };

    Ok(EvmBlock {
        hash,
        parent_hash,
        number,
        timestamp,
        transactions,
        ext_data: ext_data.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::codec::test_bytes::evm_block as empty_block;

    #[test]
    fn decodes_header_fields_and_hash() {
        let raw = empty_block(42, 1_700_000_000, &[]);
        let block = decode_block(&raw).unwrap();
        assert_eq!(block.number, 42);
        assert_eq!(block.timestamp, 1_700_000_000);
        assert_eq!(block.parent_hash, B256::repeat_byte(0x11));
        assert!(block.transactions.is_empty());
        assert!(block.ext_data.is_empty());

        let again = decode_block(&raw).unwrap();
        assert_eq!(block.hash, again.hash);
    }

    #[test]
    fn keeps_ext_data() {
        let raw = empty_block(1, 1, &[0, 0, 0, 0, 0, 0]);
        let block = decode_block(&raw).unwrap();
        assert_eq!(block.ext_data, vec![0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_non_list_input() {
        assert!(decode_block(&[0x80]).is_err());
    }
}
