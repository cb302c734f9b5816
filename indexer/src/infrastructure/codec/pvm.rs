//! Platform chain (PVM) blocks and transactions.

use crate::domain::errors::DecodeError;

use super::components::{
    read_credentials, read_owner, read_subnet_auth, BaseTx, OutputOwners, TransferableInput,
    TransferableOutput,
};
use super::config::{CodecConfig, TypeTag};
use super::ids::{Id, ShortId};
use super::reader::Reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    pub node_id: ShortId,
    pub start: u64,
    pub end: u64,
    pub weight: u64,
}

impl Validator {
    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            node_id: r.short_id()?,
            start: r.u64()?,
            end: r.u64()?,
            weight: r.u64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PvmTx {
    AddValidator {
        base: BaseTx,
        validator: Validator,
        stake: Vec<TransferableOutput>,
        rewards_owner: OutputOwners,
        shares: u32,
    },
    AddSubnetValidator {
        base: BaseTx,
        validator: Validator,
        subnet: Id,
    },
    AddDelegator {
        base: BaseTx,
        validator: Validator,
        stake: Vec<TransferableOutput>,
        rewards_owner: OutputOwners,
    },
    CreateChain {
        base: BaseTx,
        subnet: Id,
        name: String,
        vm_id: Id,
        fx_ids: Vec<Id>,
        genesis: Vec<u8>,
    },
    CreateSubnet {
        base: BaseTx,
        owner: OutputOwners,
    },
    Import {
        base: BaseTx,
        source_chain: Id,
        imported_ins: Vec<TransferableInput>,
    },
    Export {
        base: BaseTx,
        destination_chain: Id,
        exported_outs: Vec<TransferableOutput>,
    },
    AdvanceTime {
        time: u64,
    },
    RewardValidator {
        tx_id: Id,
    },
}

impl PvmTx {
    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.type_tag()? {
            TypeTag::PvmAddValidatorTx => Ok(PvmTx::AddValidator {
                base: BaseTx::read(r)?,
                validator: Validator::read(r)?,
                stake: r.vec(TransferableOutput::read)?,
                rewards_owner: read_owner(r)?,
                shares: r.u32()?,
            }),
            TypeTag::PvmAddSubnetValidatorTx => {
                let base = BaseTx::read(r)?;
                let validator = Validator::read(r)?;
                let subnet = r.id()?;
                read_subnet_auth(r)?;
                Ok(PvmTx::AddSubnetValidator {
                    base,
                    validator,
                    subnet,
                })
            }
            TypeTag::PvmAddDelegatorTx => Ok(PvmTx::AddDelegator {
                base: BaseTx::read(r)?,
                validator: Validator::read(r)?,
                stake: r.vec(TransferableOutput::read)?,
                rewards_owner: read_owner(r)?,
            }),
            TypeTag::PvmCreateChainTx => {
                let base = BaseTx::read(r)?;
                let subnet = r.id()?;
                let name = r.string()?;
                let vm_id = r.id()?;
                let fx_ids = r.vec(|r| r.id())?;
                let genesis = r.bytes()?;
                read_subnet_auth(r)?;
                Ok(PvmTx::CreateChain {
                    base,
                    subnet,
                    name,
                    vm_id,
                    fx_ids,
                    genesis,
                })
            }
            TypeTag::PvmCreateSubnetTx => Ok(PvmTx::CreateSubnet {
                base: BaseTx::read(r)?,
                owner: read_owner(r)?,
            }),
            TypeTag::PvmImportTx => Ok(PvmTx::Import {
                base: BaseTx::read(r)?,
                source_chain: r.id()?,
                imported_ins: r.vec(TransferableInput::read)?,
            }),
            TypeTag::PvmExportTx => Ok(PvmTx::Export {
                base: BaseTx::read(r)?,
                destination_chain: r.id()?,
                exported_outs: r.vec(TransferableOutput::read)?,
            }),
            TypeTag::PvmAdvanceTimeTx => Ok(PvmTx::AdvanceTime { time: r.u64()? }),
            TypeTag::PvmRewardValidatorTx => Ok(PvmTx::RewardValidator { tx_id: r.id()? }),
            other => Err(DecodeError::UnexpectedType(format!(
                "{:?} as platform transaction",
                other
            ))),
        }
    }
}

/// A signed platform transaction. The id hashes the codec version plus the tx bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPvmTx {
    pub id: Id,
    pub unsigned: PvmTx,
}

fn read_signed_tx(r: &mut Reader<'_>) -> Result<SignedPvmTx, DecodeError> {
    let start = r.position();
    let unsigned = PvmTx::read(r)?;
    read_credentials(r)?;
    let end = r.position();

    let mut signed = Vec::with_capacity(2 + end - start);
    signed.extend_from_slice(&r.version().to_be_bytes());
    signed.extend_from_slice(r.slice(start, end));

    Ok(SignedPvmTx {
        id: Id::digest(&signed),
        unsigned,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PvmBlockKind {
    Proposal(SignedPvmTx),
    Abort,
    Commit,
    Standard(Vec<SignedPvmTx>),
    Atomic(SignedPvmTx),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvmBlock {
    pub id: Id,
    pub parent: Id,
    pub height: u64,
    pub kind: PvmBlockKind,
}

impl PvmBlock {
    /// Transactions carried by the block, in order
    pub fn txs(&self) -> Vec<&SignedPvmTx> {
        match &self.kind {
            PvmBlockKind::Proposal(tx) | PvmBlockKind::Atomic(tx) => vec![tx],
            PvmBlockKind::Standard(txs) => txs.iter().collect(),
            PvmBlockKind::Abort | PvmBlockKind::Commit => Vec::new(),
        }
    }
}

/// Decode one platform chain container. The block id is the hash of its bytes.
pub fn decode_block(bytes: &[u8], config: &CodecConfig) -> Result<PvmBlock, DecodeError> {
    let mut r = Reader::new(bytes, config)?;
    let tag = r.type_tag()?;
    let parent = r.id()?;
    let height = r.u64()?;

    let kind = match tag {
        TypeTag::PvmProposalBlock => PvmBlockKind::Proposal(read_signed_tx(&mut r)?),
        TypeTag::PvmAbortBlock => PvmBlockKind::Abort,
        TypeTag::PvmCommitBlock => PvmBlockKind::Commit,
        TypeTag::PvmStandardBlock => PvmBlockKind::Standard(r.vec(read_signed_tx)?),
        TypeTag::PvmAtomicBlock => PvmBlockKind::Atomic(read_signed_tx(&mut r)?),
        other => {
            return Err(DecodeError::UnexpectedType(format!(
                "{:?} as platform block",
                other
            )))
        }
    };
    r.finish()?;

    Ok(PvmBlock {
        id: Id::digest(bytes),
        parent,
        height,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::codec::test_bytes::Bytes;

    fn header(type_id: u32, height: u64) -> Bytes {
        Bytes::version(0)
            .u32(type_id)
            .id(&Id::digest(b"parent"))
            .u64(height)
    }

    #[test]
    fn commit_block_carries_no_txs() {
        let bytes = header(2, 7).build();
        let block = decode_block(&bytes, &CodecConfig::pvm()).unwrap();

        assert_eq!(block.kind, PvmBlockKind::Commit);
        assert_eq!(block.height, 7);
        assert_eq!(block.parent, Id::digest(b"parent"));
        assert_eq!(block.id, Id::digest(&bytes));
        assert!(block.txs().is_empty());
    }

    #[test]
    fn empty_standard_block() {
        let bytes = header(3, 9).u32(0).build();
        let block = decode_block(&bytes, &CodecConfig::pvm()).unwrap();
        assert_eq!(block.kind, PvmBlockKind::Standard(Vec::new()));
    }

    #[test]
    fn rejects_non_block_types_and_trailing_bytes() {
        let output = header(7, 1).build();
        assert!(decode_block(&output, &CodecConfig::pvm()).is_err());

        let trailing = header(1, 1).u8(0).build();
        assert!(decode_block(&trailing, &CodecConfig::pvm()).is_err());
    }
}
