//! Platform chain containers: a block carrying zero or more transactions.

use serde_json::{Map, Value};

use super::shared::{
    finalize, prepare_inputs, prepare_outputs, prepare_rewards_owner, unix_time,
};
use super::{ContainerDecoder, DecodedContainer, MapperContext};
use crate::domain::errors::DecodeError;
use crate::domain::models::{Block, BlockType, Chain, Transaction, TxType};
use crate::domain::ports::RawContainer;
use crate::infrastructure::codec::components::{BaseTx, TransferableOutput};
use crate::infrastructure::codec::pvm::{self, PvmBlockKind, PvmTx, SignedPvmTx, Validator};
use crate::infrastructure::codec::CodecConfig;

/// Platform chain shares are parts per million; metadata keeps a percentage
const SHARES_PER_PERCENT: f64 = 10_000.0;

pub struct PChainMapper {
    ctx: MapperContext,
    codec: CodecConfig,
}

impl PChainMapper {
    pub fn new(ctx: MapperContext, codec: CodecConfig) -> Self {
        Self { ctx, codec }
    }

    fn with_base(&self, tx: &SignedPvmTx, tx_type: TxType, base: &BaseTx) -> Result<Transaction, DecodeError> {
        let mut mapped = Transaction::new(tx.id.to_string(), tx_type);
        mapped.set_raw_memo(&base.memo);
        mapped.inputs = prepare_inputs(&base.ins);
        mapped.outputs = prepare_outputs(&self.ctx, &base.outs, &tx.id, 0)?;
        Ok(mapped)
    }

    /// Base outputs followed by the locked stake
    fn add_stake(
        &self,
        tx: &SignedPvmTx,
        mapped: &mut Transaction,
        stake: &[TransferableOutput],
    ) -> Result<(), DecodeError> {
        let start = mapped.outputs.len() as u64;
        let mut staked = prepare_outputs(&self.ctx, stake, &tx.id, start)?;
        for out in staked.iter_mut() {
            out.stake = true;
        }
        mapped.outputs.extend(staked);
        Ok(())
    }

    /// Map one transaction. Advance-time transactions carry nothing worth storing.
    fn map_tx(&self, tx: &SignedPvmTx, decoded: &mut DecodedContainer) -> Result<Option<Transaction>, DecodeError> {
        let mapped = match &tx.unsigned {
            PvmTx::AddValidator {
                base,
                validator,
                stake,
                rewards_owner,
                shares,
            } => {
                let mut mapped = self.with_base(tx, TxType::PAddValidator, base)?;
                mapped.metadata = staking_metadata(validator);
                mapped.set_meta(
                    "validator_commission_rate",
                    *shares as f64 / SHARES_PER_PERCENT,
                );
                self.add_stake(tx, &mut mapped, stake)?;
                decoded.rewards_owners.push(prepare_rewards_owner(
                    &self.ctx,
                    &tx.id,
                    mapped.outputs.len(),
                    rewards_owner,
                )?);
                mapped
            }
            PvmTx::AddDelegator {
                base,
                validator,
                stake,
                rewards_owner,
            } => {
                let mut mapped = self.with_base(tx, TxType::PAddDelegator, base)?;
                mapped.metadata = staking_metadata(validator);
                self.add_stake(tx, &mut mapped, stake)?;
                decoded.rewards_owners.push(prepare_rewards_owner(
                    &self.ctx,
                    &tx.id,
                    mapped.outputs.len(),
                    rewards_owner,
                )?);
                mapped
            }
            PvmTx::AddSubnetValidator {
                base,
                validator,
                subnet,
            } => {
                let mut mapped = self.with_base(tx, TxType::PAddSubnetValidator, base)?;
                mapped.metadata = staking_metadata(validator);
                mapped.set_meta("validator_node_id", validator.node_id.node_id());
                mapped.set_meta("subnet_id", subnet.to_string());
                mapped
            }
            PvmTx::CreateChain {
                base,
                subnet,
                name,
                vm_id,
                ..
            } => {
                let mut mapped = self.with_base(tx, TxType::PCreateChain, base)?;
                let chain = Chain {
                    chain_id: tx.id.to_string(),
                    name: name.clone(),
                    vm: vm_id.to_string(),
                    network: base.network_id,
                    subnet: subnet.to_string(),
                };
                mapped.set_meta("chain_name", chain.name.clone());
                mapped.set_meta("chain_id", chain.chain_id.clone());
                mapped.set_meta("chain_vm_id", chain.vm.clone());
                mapped.set_meta("chain_network_id", chain.network);
                mapped.set_meta("chain_subnet_id", chain.subnet.clone());
                decoded.chains.push(chain);
                mapped
            }
            PvmTx::CreateSubnet { base, .. } => {
                let mut mapped = self.with_base(tx, TxType::PCreateSubnet, base)?;
                mapped.set_meta("subnet_id", tx.id.to_string());
                mapped
            }
            PvmTx::Import {
                base,
                source_chain,
                imported_ins,
            } => {
                let mut mapped = self.with_base(tx, TxType::PImport, base)?;
                mapped.inputs.extend(prepare_inputs(imported_ins));
                mapped.source_chain = Some(source_chain.to_string());
                mapped
            }
            PvmTx::Export {
                base,
                destination_chain,
                exported_outs,
            } => {
                let mut mapped = self.with_base(tx, TxType::PExport, base)?;
                let start = mapped.outputs.len() as u64;
                mapped
                    .outputs
                    .extend(prepare_outputs(&self.ctx, exported_outs, &tx.id, start)?);
                mapped.destination_chain = Some(destination_chain.to_string());
                mapped
            }
            PvmTx::RewardValidator { tx_id } => {
                let mut mapped = Transaction::new(tx.id.to_string(), TxType::PRewardValidator);
                mapped.reference_tx_id = Some(tx_id.to_string());
                mapped
            }
            PvmTx::AdvanceTime { .. } => return Ok(None),
        };
        Ok(Some(mapped))
    }
}

fn staking_metadata(validator: &Validator) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("node_id".to_string(), validator.node_id.node_id().into());
    meta.insert(
        "start_time".to_string(),
        unix_time(validator.start).to_rfc3339().into(),
    );
    meta.insert(
        "end_time".to_string(),
        unix_time(validator.end).to_rfc3339().into(),
    );
    meta.insert(
        "duration".to_string(),
        validator.end.saturating_sub(validator.start).into(),
    );
    meta.insert("weight".to_string(), validator.weight.into());
    meta
}

fn block_type(kind: &PvmBlockKind) -> BlockType {
    match kind {
        PvmBlockKind::Proposal(_) => BlockType::Proposal,
        PvmBlockKind::Abort => BlockType::Abort,
        PvmBlockKind::Commit => BlockType::Commit,
        PvmBlockKind::Standard(_) => BlockType::Standard,
        PvmBlockKind::Atomic(_) => BlockType::Atomic,
    }
}

impl ContainerDecoder for PChainMapper {
    fn chain(&self) -> &str {
        &self.ctx.chain_id
    }

    fn decode(&self, container: &RawContainer) -> Result<DecodedContainer, DecodeError> {
        let raw = pvm::decode_block(&container.bytes, &self.codec)?;
        let block = Block {
            id: raw.id.to_string(),
            parent: raw.parent.to_string(),
            chain: self.ctx.chain_id.clone(),
            block_type: block_type(&raw.kind),
            height: raw.height,
            timestamp: container.timestamp,
        };

        let mut decoded = DecodedContainer::default();
        for tx in raw.txs() {
            if let Some(mut mapped) = self.map_tx(tx, &mut decoded)? {
                finalize(&self.ctx, &mut mapped, container.timestamp, Some(&block));
                decoded.transactions.push(mapped);
            }
        }
        decoded.block = Some(block);
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::codec::test_bytes::Bytes;
    use crate::infrastructure::codec::{Id, ShortId};
    use chrono::Utc;

    fn mapper(native: &Id) -> PChainMapper {
        let ctx = MapperContext::new("p-chain", 1, native.to_string(), "avax").unwrap();
        PChainMapper::new(ctx, CodecConfig::pvm())
    }

    fn container(bytes: Vec<u8>) -> RawContainer {
        RawContainer {
            index: 1,
            id: "c".to_string(),
            bytes,
            timestamp: Utc::now(),
        }
    }

    fn add_validator_block(avax: &Id, shares: u32) -> Vec<u8> {
        let chain = Id::EMPTY;
        let prev = Id::digest(b"funding");
        let addr = ShortId([5u8; 20]);
        let node = ShortId([7u8; 20]);

        let ins = Bytes::default()
            .id(&prev)
            .u32(0)
            .id(avax)
            .transfer_input(5, 2_100)
            .build();

        Bytes::version(0)
            .u32(0)
            .id(&Id::digest(b"parent"))
            .u64(42)
            .u32(12)
            .base_tx(&chain, (0, vec![]), (1, ins), b"")
            .short_id(&node)
            .u64(1_600_000_000)
            .u64(1_600_086_400)
            .u64(2_000)
            .u32(1)
            .id(avax)
            .u32(22)
            .u64(1_700_000_000)
            .transfer_output(7, 2_000, &addr)
            .u32(11)
            .u64(0)
            .u32(1)
            .u32(1)
            .short_id(&addr)
            .u32(shares)
            .u32(0)
            .build()
    }

    #[test]
    fn add_validator_stakes_and_names_reward_owner() {
        let avax = Id::digest(b"avax");
        let bytes = add_validator_block(&avax, 20_000);
        let decoded = mapper(&avax).decode(&container(bytes.clone())).unwrap();

        let block = decoded.block.as_ref().unwrap();
        assert_eq!(block.id, Id::digest(&bytes).to_string());
        assert_eq!(block.block_type, BlockType::Proposal);
        assert_eq!(block.height, 42);
        assert_eq!(block.parent, Id::digest(b"parent").to_string());

        let tx = &decoded.transactions[0];
        assert_eq!(tx.tx_type, TxType::PAddValidator);
        assert_eq!(tx.block.as_deref(), Some(block.id.as_str()));
        assert_eq!(tx.block_height, Some(42));
        assert_eq!(tx.fee, 100);
        assert!(tx.outputs[0].stake);
        assert_eq!(tx.outputs[0].locktime, 1_700_000_000);
        assert_eq!(tx.metadata["validator_commission_rate"], Value::from(2.0));
        assert_eq!(tx.metadata["duration"], Value::from(86_400u64));
        assert!(tx.meta_str("node_id").unwrap().starts_with("NodeID-"));

        let owner = &decoded.rewards_owners[0];
        assert_eq!(owner.id, tx.id);
        assert_eq!(owner.outputs[0].index, 1);
        assert_eq!(owner.outputs[1].index, 2);
    }

    #[test]
    fn commit_block_has_no_transactions() {
        let avax = Id::digest(b"avax");
        let bytes = Bytes::version(0)
            .u32(2)
            .id(&Id::digest(b"proposal"))
            .u64(43)
            .build();
        let decoded = mapper(&avax).decode(&container(bytes)).unwrap();
        assert_eq!(decoded.block.unwrap().block_type, BlockType::Commit);
        assert!(decoded.transactions.is_empty());
    }

    #[test]
    fn advance_time_is_skipped() {
        let avax = Id::digest(b"avax");
        let bytes = Bytes::version(0)
            .u32(0)
            .id(&Id::digest(b"parent"))
            .u64(7)
            .u32(19)
            .u64(1_600_000_000)
            .u32(0)
            .build();
        let decoded = mapper(&avax).decode(&container(bytes)).unwrap();
        assert!(decoded.transactions.is_empty());
        assert!(decoded.block.is_some());
    }

    #[test]
    fn reward_validator_references_staking_tx() {
        let avax = Id::digest(b"avax");
        let staking = Id::digest(b"staking");
        let bytes = Bytes::version(0)
            .u32(0)
            .id(&Id::digest(b"parent"))
            .u64(9)
            .u32(20)
            .id(&staking)
            .u32(0)
            .build();
        let decoded = mapper(&avax).decode(&container(bytes)).unwrap();
        let tx = &decoded.transactions[0];
        assert_eq!(tx.tx_type, TxType::PRewardValidator);
        assert_eq!(tx.reference_tx_id, Some(staking.to_string()));
        assert_eq!(tx.fee, 0);
    }
}
