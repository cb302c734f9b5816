//! Helpers shared by the UTXO chain mappers.

use base64::Engine;
use chrono::{DateTime, Utc};

use super::MapperContext;
use crate::domain::errors::DecodeError;
use crate::domain::models::{
    Block, Output, OutputType, RewardsOwner, RewardsOwnerAddress, RewardsOwnerOutput,
    Transaction, TxStatus,
};
use crate::infrastructure::codec::components::{
    OutputOwners, OutputVariant, TransferableInput, TransferableOutput,
};
use crate::infrastructure::codec::Id;

/// Reference to the UTXO an input spends
pub fn prepare_input(input: &TransferableInput) -> Output {
    let mut out = Output::new(
        input.utxo.output_id().to_string(),
        input.utxo.tx_id.to_string(),
        input.asset.to_string(),
    );
    out.index = input.utxo.output_index as u64;
    out.amount = input.input.amount();
    out
}

pub fn prepare_inputs<'a>(inputs: impl IntoIterator<Item = &'a TransferableInput>) -> Vec<Output> {
    inputs.into_iter().map(prepare_input).collect()
}

/// The `index`-th output of `tx_id`
pub fn prepare_output(
    ctx: &MapperContext,
    variant: &OutputVariant,
    asset: &str,
    index: u64,
    tx_id: &Id,
) -> Result<Output, DecodeError> {
    let id = tx_id.prefix(index).to_string();
    let mut out = Output::new(id.clone(), tx_id.to_string(), asset);
    out.chain = ctx.chain_id.clone();
    out.index = index;

    let owners = variant.owners();
    out.threshold = owners.threshold;
    out.addresses = ctx.addresses.format_all(&owners.addrs)?;

    match variant {
        OutputVariant::SecpTransfer { amount, owners } => {
            out.output_type = Some(OutputType::Transfer);
            out.amount = *amount;
            out.locktime = owners.locktime;
        }
        OutputVariant::SecpMint(owners) => {
            out.output_type = Some(OutputType::Mint);
            out.locktime = owners.locktime;
        }
        OutputVariant::StakeableLock { locktime, inner } => {
            out.output_type = Some(OutputType::StakeableLock);
            out.amount = inner.amount();
            out.locktime = *locktime;
        }
        OutputVariant::NftMint { group, owners } => {
            out.output_type = Some(OutputType::NftMint);
            out.locktime = owners.locktime;
            out.group = *group;
        }
        OutputVariant::NftTransfer {
            group,
            payload,
            owners,
        } => {
            out.output_type = Some(OutputType::NftTransfer);
            out.locktime = owners.locktime;
            out.group = *group;
            out.payload = Some(base64::engine::general_purpose::STANDARD.encode(payload));
        }
        OutputVariant::PropertyMint(_) | OutputVariant::PropertyOwned(_) => {
            return Err(DecodeError::UnknownOutputType(format!("{} (property)", id)));
        }
    }

    Ok(out)
}

/// Outputs numbered from `start`, in order
pub fn prepare_outputs<'a>(
    ctx: &MapperContext,
    outputs: impl IntoIterator<Item = &'a TransferableOutput>,
    tx_id: &Id,
    start: u64,
) -> Result<Vec<Output>, DecodeError> {
    outputs
        .into_iter()
        .enumerate()
        .map(|(offset, o)| {
            prepare_output(ctx, &o.out, &o.asset.to_string(), start + offset as u64, tx_id)
        })
        .collect()
}

/// Reward recipients of a staking transaction. The reward is paid to the two
/// outputs following the transaction's own outputs.
pub fn prepare_rewards_owner(
    ctx: &MapperContext,
    tx_id: &Id,
    outputs_count: usize,
    owner: &OutputOwners,
) -> Result<RewardsOwner, DecodeError> {
    let id = tx_id.to_string();
    let addresses = ctx
        .addresses
        .format_all(&owner.addrs)?
        .into_iter()
        .enumerate()
        .map(|(idx, address)| RewardsOwnerAddress {
            id: id.clone(),
            address,
            index: idx as u32,
        })
        .collect();

    let outputs = (outputs_count..outputs_count + 2)
        .map(|pos| RewardsOwnerOutput {
            id: tx_id.prefix(pos as u64).to_string(),
            transaction_id: id.clone(),
            index: pos as u32,
        })
        .collect();

    Ok(RewardsOwner {
        id,
        locktime: owner.locktime,
        threshold: owner.threshold,
        addresses,
        outputs,
    })
}

/// Stamp chain, time and block onto a mapped transaction and compute its totals
pub fn finalize(
    ctx: &MapperContext,
    tx: &mut Transaction,
    timestamp: DateTime<Utc>,
    block: Option<&Block>,
) {
    tx.status = TxStatus::Accepted;
    tx.chain = ctx.chain_id.clone();
    tx.timestamp = timestamp;
    if let Some(block) = block {
        tx.block = Some(block.id.clone());
        tx.block_height = Some(block.height);
    }
    for out in tx.outputs.iter_mut() {
        out.chain = ctx.chain_id.clone();
    }
    if tx.uses_utxos() {
        tx.update_totals(&ctx.native_asset);
    }
}

/// Unix seconds as a UTC time
pub fn unix_time(secs: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs as i64, 0).unwrap_or_default()
}
