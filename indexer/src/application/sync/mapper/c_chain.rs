//! Contract chain containers: an EVM block with optional atomic transactions
//! in its extra data.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};

use super::shared::{finalize, prepare_inputs, prepare_outputs, unix_time};
use super::{ContainerDecoder, DecodedContainer, MapperContext};
use crate::domain::errors::DecodeError;
use crate::domain::models::{Block, BlockType, Output, OutputType, Transaction, TxType};
use crate::domain::ports::RawContainer;
use crate::infrastructure::codec::atomic::{self, AtomicTx, SignedAtomicTx};
use crate::infrastructure::codec::evm_block::{self, EvmTx};
use crate::infrastructure::codec::CodecConfig;

/// Time from which blocks carry a list of atomic transactions instead of one.
/// Local networks have it active from genesis.
pub fn batched_atomic_since(network_id: u32) -> DateTime<Utc> {
    match network_id {
        1 => unix_time(1_638_468_000),
        5 => unix_time(1_637_766_000),
        _ => DateTime::<Utc>::default(),
    }
}

pub struct CChainMapper {
    ctx: MapperContext,
    codec: CodecConfig,
    batched_since: DateTime<Utc>,
}

impl CChainMapper {
    pub fn new(ctx: MapperContext, codec: CodecConfig) -> Self {
        let batched_since = batched_atomic_since(ctx.network_id);
        Self {
            ctx,
            codec,
            batched_since,
        }
    }

    fn map_atomic(&self, tx: &SignedAtomicTx) -> Result<Transaction, DecodeError> {
        let id = tx.id.to_string();
        let mapped = match &tx.unsigned {
            AtomicTx::Import {
                source_chain,
                imported_ins,
                outs,
                ..
            } => {
                let mut mapped = Transaction::new(id.clone(), TxType::CAtomicImport);
                mapped.source_chain = Some(source_chain.to_string());
                mapped.inputs = prepare_inputs(imported_ins);
                mapped.outputs = outs
                    .iter()
                    .enumerate()
                    .map(|(idx, credit)| {
                        let mut out =
                            Output::new(tx.id.prefix(idx as u64).to_string(), id.clone(), credit.asset.to_string());
                        out.output_type = Some(OutputType::Transfer);
                        out.index = idx as u64;
                        out.amount = credit.amount;
                        out.threshold = 1;
                        out.addresses = vec![Address::from(credit.address).to_checksum(None)];
                        out
                    })
                    .collect();
                mapped
            }
            AtomicTx::Export {
                destination_chain,
                ins,
                exported_outs,
                ..
            } => {
                let mut mapped = Transaction::new(id.clone(), TxType::CAtomicExport);
                mapped.destination_chain = Some(destination_chain.to_string());
                mapped.nonce = ins.first().map(|debit| debit.nonce);
                mapped.inputs = ins
                    .iter()
                    .enumerate()
                    .map(|(idx, debit)| {
                        let mut input =
                            Output::new(tx.id.prefix(idx as u64).to_string(), id.clone(), debit.asset.to_string());
                        input.index = idx as u64;
                        input.amount = debit.amount;
                        input.addresses = vec![Address::from(debit.address).to_checksum(None)];
                        input
                    })
                    .collect();
                mapped.outputs = prepare_outputs(&self.ctx, exported_outs, &tx.id, 0)?;
                mapped
            }
        };
        Ok(mapped)
    }
}

fn map_evm(tx: &EvmTx) -> Transaction {
    let mut mapped = Transaction::new(format!("{:#x}", tx.hash), TxType::CEvm);
    mapped.nonce = Some(tx.nonce);
    mapped.set_meta("sender", tx.sender.to_checksum(None));
    mapped.set_meta("receiver", tx.receiver.map(|r| r.to_checksum(None)));
    mapped.set_meta("nonce", tx.nonce);
    mapped.set_meta("amount", tx.value.to_string());
    mapped.set_meta("gas", tx.gas);
    mapped.set_meta("gas_price", tx.gas_price.to_string());
    mapped.set_meta("cost", tx.cost().to_string());
    mapped
}

impl ContainerDecoder for CChainMapper {
    fn chain(&self) -> &str {
        &self.ctx.chain_id
    }

    fn decode(&self, container: &RawContainer) -> Result<DecodedContainer, DecodeError> {
        let raw = evm_block::decode_block(&container.bytes)?;
        let timestamp = unix_time(raw.timestamp);
        let block = Block {
            id: format!("{:#x}", raw.hash),
            parent: format!("{:#x}", raw.parent_hash),
            chain: self.ctx.chain_id.clone(),
            block_type: BlockType::Evm,
            height: raw.number,
            timestamp,
        };

        let batched = timestamp >= self.batched_since;
        let atomic_txs = atomic::decode_ext_data(&raw.ext_data, batched, &self.codec)?;

        let mut decoded = DecodedContainer::default();
        for tx in &atomic_txs {
            let mut mapped = self.map_atomic(tx)?;
            finalize(&self.ctx, &mut mapped, timestamp, Some(&block));
            decoded.transactions.push(mapped);
        }
        for tx in &raw.transactions {
            let mut mapped = map_evm(tx);
            finalize(&self.ctx, &mut mapped, timestamp, Some(&block));
            decoded.transactions.push(mapped);
        }
        decoded.block = Some(block);
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::codec::test_bytes::{evm_block, Bytes};
    use crate::infrastructure::codec::{Id, ShortId};

    const BEFORE_BATCHING: u64 = 1_620_000_000;

    fn mapper(native: &Id) -> CChainMapper {
        let ctx = MapperContext::new("c-chain", 1, native.to_string(), "avax").unwrap();
        CChainMapper::new(ctx, CodecConfig::atomic())
    }

    fn container(bytes: Vec<u8>) -> RawContainer {
        RawContainer {
            index: 2,
            id: "c".to_string(),
            bytes,
            timestamp: Utc::now(),
        }
    }

    fn import_tx(avax: &Id) -> Vec<u8> {
        Bytes::version(0)
            .u32(0)
            .u32(1)
            .id(&Id::digest(b"c-chain"))
            .id(&Id::digest(b"x-chain"))
            .u32(1)
            .id(&Id::digest(b"exported"))
            .u32(0)
            .id(avax)
            .transfer_input(5, 1_000)
            .u32(1)
            .short_id(&ShortId([0xab; 20]))
            .u64(900)
            .id(avax)
            .u32(0)
            .build()
    }

    #[test]
    fn block_without_atomic_data() {
        let avax = Id::digest(b"avax");
        let decoded = mapper(&avax)
            .decode(&container(evm_block(12, BEFORE_BATCHING, &[])))
            .unwrap();
        let block = decoded.block.unwrap();
        assert_eq!(block.height, 12);
        assert_eq!(block.block_type, BlockType::Evm);
        assert!(block.id.starts_with("0x"));
        assert_eq!(block.id.len(), 66);
        assert!(decoded.transactions.is_empty());
    }

    #[test]
    fn atomic_import_credits_evm_account() {
        let avax = Id::digest(b"avax");
        let ext = import_tx(&avax);
        let decoded = mapper(&avax)
            .decode(&container(evm_block(12, BEFORE_BATCHING, &ext)))
            .unwrap();

        let tx = &decoded.transactions[0];
        assert_eq!(tx.tx_type, TxType::CAtomicImport);
        assert_eq!(tx.chain, "c-chain");
        assert_eq!(tx.block_height, Some(12));
        assert_eq!(tx.fee, 100);
        assert_eq!(tx.source_chain, Some(Id::digest(b"x-chain").to_string()));
        assert_eq!(
            tx.spent_output_ids(),
            vec![Id::digest(b"exported").prefix(0).to_string()]
        );
        assert_eq!(tx.outputs[0].amount, 900);
        assert!(tx.outputs[0].addresses[0].starts_with("0x"));
    }

    #[test]
    fn batched_extra_data_after_upgrade() {
        let avax = Id::digest(b"avax");
        let single = import_tx(&avax);
        // list of one transaction: codec version, count, then the body without its version
        let ext = Bytes::version(0).u32(1).raw(&single[2..]).build();
        let decoded = mapper(&avax)
            .decode(&container(evm_block(12, 1_700_000_000, &ext)))
            .unwrap();
        assert_eq!(decoded.transactions.len(), 1);

        let unbatched = mapper(&avax).decode(&container(evm_block(12, 1_700_000_000, &single)));
        assert!(unbatched.is_err());
    }

    #[test]
    fn fuji_and_local_upgrade_times() {
        assert!(batched_atomic_since(5) < batched_atomic_since(1));
        assert_eq!(batched_atomic_since(12345), DateTime::<Utc>::default());
    }
}
