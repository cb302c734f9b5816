//! Wire structures shared by the UTXO chains: outputs, inputs, owners and the base transaction.

use crate::domain::errors::DecodeError;

use super::config::TypeTag;
use super::ids::{Id, ShortId};
use super::reader::Reader;

/// Addresses that can spend an output after `locktime`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOwners {
    pub locktime: u64,
    pub threshold: u32,
    pub addrs: Vec<ShortId>,
}

impl OutputOwners {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            locktime: r.u64()?,
            threshold: r.u32()?,
            addrs: r.vec(|r| r.short_id())?,
        })
    }
}

/// Output variants of the secp256k1, nft, property and stakeable fxs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputVariant {
    SecpTransfer {
        amount: u64,
        owners: OutputOwners,
    },
    SecpMint(OutputOwners),
    NftMint {
        group: u32,
        owners: OutputOwners,
    },
    NftTransfer {
        group: u32,
        payload: Vec<u8>,
        owners: OutputOwners,
    },
    PropertyMint(OutputOwners),
    PropertyOwned(OutputOwners),
    StakeableLock {
        locktime: u64,
        inner: Box<OutputVariant>,
    },
}

impl OutputVariant {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let tag = r.type_tag()?;
        Self::read_tagged(r, tag)
    }

    fn read_tagged(r: &mut Reader<'_>, tag: TypeTag) -> Result<Self, DecodeError> {
        match tag {
            TypeTag::SecpTransferOutput => Ok(OutputVariant::SecpTransfer {
                amount: r.u64()?,
                owners: OutputOwners::read(r)?,
            }),
            TypeTag::SecpMintOutput => Ok(OutputVariant::SecpMint(OutputOwners::read(r)?)),
            TypeTag::NftMintOutput => Ok(OutputVariant::NftMint {
                group: r.u32()?,
                owners: OutputOwners::read(r)?,
            }),
            TypeTag::NftTransferOutput => Ok(nft_transfer_output(r)?),
            TypeTag::PropertyMintOutput => {
                Ok(OutputVariant::PropertyMint(OutputOwners::read(r)?))
            }
            TypeTag::PropertyOwnedOutput => {
                Ok(OutputVariant::PropertyOwned(OutputOwners::read(r)?))
            }
            TypeTag::StakeableLockOut => {
                let locktime = r.u64()?;
                let inner = OutputVariant::read(r)?;
                if matches!(inner, OutputVariant::StakeableLock { .. }) {
                    return Err(DecodeError::UnexpectedType(
                        "nested stakeable lock output".to_string(),
                    ));
                }
                Ok(OutputVariant::StakeableLock {
                    locktime,
                    inner: Box::new(inner),
                })
            }
            other => Err(DecodeError::UnexpectedType(format!("{:?} as output", other))),
        }
    }

    /// Amount carried by the output; mint and nft outputs carry none
    pub fn amount(&self) -> u64 {
        match self {
            OutputVariant::SecpTransfer { amount, .. } => *amount,
            OutputVariant::StakeableLock { inner, .. } => inner.amount(),
            _ => 0,
        }
    }

    pub fn owners(&self) -> &OutputOwners {
        match self {
            OutputVariant::SecpTransfer { owners, .. }
            | OutputVariant::SecpMint(owners)
            | OutputVariant::NftMint { owners, .. }
            | OutputVariant::NftTransfer { owners, .. }
            | OutputVariant::PropertyMint(owners)
            | OutputVariant::PropertyOwned(owners) => owners,
            OutputVariant::StakeableLock { inner, .. } => inner.owners(),
        }
    }
}

/// Body of an nft transfer output, also embedded in nft transfer operations
fn nft_transfer_output(r: &mut Reader<'_>) -> Result<OutputVariant, DecodeError> {
    Ok(OutputVariant::NftTransfer {
        group: r.u32()?,
        payload: r.bytes()?,
        owners: OutputOwners::read(r)?,
    })
}

/// Input variants spending an output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputVariant {
    SecpTransfer { amount: u64, sig_indices: Vec<u32> },
    StakeableLock { locktime: u64, inner: Box<InputVariant> },
}

impl InputVariant {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.type_tag()? {
            TypeTag::SecpTransferInput => Ok(InputVariant::SecpTransfer {
                amount: r.u64()?,
                sig_indices: r.vec(|r| r.u32())?,
            }),
            TypeTag::StakeableLockIn => {
                let locktime = r.u64()?;
                let inner = InputVariant::read(r)?;
                Ok(InputVariant::StakeableLock {
                    locktime,
                    inner: Box::new(inner),
                })
            }
            other => Err(DecodeError::UnexpectedType(format!("{:?} as input", other))),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            InputVariant::SecpTransfer { amount, .. } => *amount,
            InputVariant::StakeableLock { inner, .. } => inner.amount(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableOutput {
    pub asset: Id,
    pub out: OutputVariant,
}

impl TransferableOutput {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            asset: r.id()?,
            out: OutputVariant::read(r)?,
        })
    }
}

/// Reference to an output of an earlier transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtxoId {
    pub tx_id: Id,
    pub output_index: u32,
}

impl UtxoId {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            tx_id: r.id()?,
            output_index: r.u32()?,
        })
    }

    /// Id of the referenced output
    pub fn output_id(&self) -> Id {
        self.tx_id.prefix(self.output_index as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableInput {
    pub utxo: UtxoId,
    pub asset: Id,
    pub input: InputVariant,
}

impl TransferableInput {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            utxo: UtxoId::read(r)?,
            asset: r.id()?,
            input: InputVariant::read(r)?,
        })
    }
}

/// Fields every UTXO transaction starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTx {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub outs: Vec<TransferableOutput>,
    pub ins: Vec<TransferableInput>,
    pub memo: Vec<u8>,
}

impl BaseTx {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            network_id: r.u32()?,
            blockchain_id: r.id()?,
            outs: r.vec(TransferableOutput::read)?,
            ins: r.vec(TransferableInput::read)?,
            memo: r.bytes()?,
        })
    }
}

/// Operations of the exchange chain fxs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationVariant {
    SecpMint {
        mint_output: OutputOwners,
        transfer_amount: u64,
        transfer_owners: OutputOwners,
    },
    NftMint {
        group: u32,
        payload: Vec<u8>,
        outputs: Vec<OutputOwners>,
    },
    NftTransfer(OutputVariant),
    PropertyMint {
        mint_output: OutputOwners,
        owned_output: OutputOwners,
    },
    PropertyBurn,
}

impl OperationVariant {
    pub fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.type_tag()? {
            TypeTag::SecpMintOperation => {
                read_sig_indices(r)?;
                let mint_output = OutputOwners::read(r)?;
                let transfer_amount = r.u64()?;
                let transfer_owners = OutputOwners::read(r)?;
                Ok(OperationVariant::SecpMint {
                    mint_output,
                    transfer_amount,
                    transfer_owners,
                })
            }
            TypeTag::NftMintOperation => {
                read_sig_indices(r)?;
                Ok(OperationVariant::NftMint {
                    group: r.u32()?,
                    payload: r.bytes()?,
                    outputs: r.vec(OutputOwners::read)?,
                })
            }
            TypeTag::NftTransferOperation => {
                read_sig_indices(r)?;
                Ok(OperationVariant::NftTransfer(nft_transfer_output(r)?))
            }
            TypeTag::PropertyMintOperation => {
                read_sig_indices(r)?;
                Ok(OperationVariant::PropertyMint {
                    mint_output: OutputOwners::read(r)?,
                    owned_output: OutputOwners::read(r)?,
                })
            }
            TypeTag::PropertyBurnOperation => {
                read_sig_indices(r)?;
                Ok(OperationVariant::PropertyBurn)
            }
            other => Err(DecodeError::UnexpectedType(format!(
                "{:?} as operation",
                other
            ))),
        }
    }

    /// Outputs the operation creates, in wire order
    pub fn outputs(&self) -> Vec<OutputVariant> {
        match self {
            OperationVariant::SecpMint {
                mint_output,
                transfer_amount,
                transfer_owners,
            } => vec![
                OutputVariant::SecpMint(mint_output.clone()),
                OutputVariant::SecpTransfer {
                    amount: *transfer_amount,
                    owners: transfer_owners.clone(),
                },
            ],
            OperationVariant::NftMint {
                group,
                payload,
                outputs,
            } => outputs
                .iter()
                .map(|owners| OutputVariant::NftTransfer {
                    group: *group,
                    payload: payload.clone(),
                    owners: owners.clone(),
                })
                .collect(),
            OperationVariant::NftTransfer(out) => vec![out.clone()],
            OperationVariant::PropertyMint {
                mint_output,
                owned_output,
            } => vec![
                OutputVariant::PropertyMint(mint_output.clone()),
                OutputVariant::PropertyOwned(owned_output.clone()),
            ],
            OperationVariant::PropertyBurn => Vec::new(),
        }
    }
}

fn read_sig_indices(r: &mut Reader<'_>) -> Result<Vec<u32>, DecodeError> {
    r.vec(|r| r.u32())
}

/// Owner set referenced through an interface (rewards owner, subnet owner)
pub fn read_owner(r: &mut Reader<'_>) -> Result<OutputOwners, DecodeError> {
    match r.type_tag()? {
        TypeTag::SecpOutputOwners => OutputOwners::read(r),
        _ => Err(DecodeError::InvalidRewardsOwner),
    }
}

/// Subnet authorization: an interface wrapping signature indices
pub fn read_subnet_auth(r: &mut Reader<'_>) -> Result<Vec<u32>, DecodeError> {
    match r.type_tag()? {
        TypeTag::SecpInput => read_sig_indices(r),
        other => Err(DecodeError::UnexpectedType(format!(
            "{:?} as subnet auth",
            other
        ))),
    }
}

/// Credentials trailing a signed transaction. Signatures are skipped.
pub fn read_credentials(r: &mut Reader<'_>) -> Result<usize, DecodeError> {
    let creds = r.vec(|r| match r.type_tag()? {
        TypeTag::SecpCredential | TypeTag::NftCredential | TypeTag::PropertyCredential => {
            r.vec(|r| r.signature()).map(|_| ())
        }
        other => Err(DecodeError::UnexpectedType(format!(
            "{:?} as credential",
            other
        ))),
    })?;
    Ok(creds.len())
}
