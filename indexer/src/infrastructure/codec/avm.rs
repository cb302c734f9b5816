//! Exchange chain (AVM) transactions.

use crate::domain::errors::DecodeError;

use super::components::{
    read_credentials, BaseTx, OperationVariant, OutputVariant, TransferableInput,
    TransferableOutput, UtxoId,
};
use super::config::{CodecConfig, TypeTag};
use super::ids::Id;
use super::reader::Reader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialState {
    pub fx_index: u32,
    pub outs: Vec<OutputVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub asset: Id,
    pub utxo_ids: Vec<UtxoId>,
    pub op: OperationVariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvmTx {
    Base(BaseTx),
    CreateAsset {
        base: BaseTx,
        name: String,
        symbol: String,
        denomination: u8,
        states: Vec<InitialState>,
    },
    Operation {
        base: BaseTx,
        ops: Vec<Operation>,
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
}

impl AvmTx {
    pub fn base(&self) -> &BaseTx {
        match self {
            AvmTx::Base(base)
            | AvmTx::CreateAsset { base, .. }
            | AvmTx::Operation { base, .. }
            | AvmTx::Import { base, .. }
            | AvmTx::Export { base, .. } => base,
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.type_tag()? {
            TypeTag::AvmBaseTx => Ok(AvmTx::Base(BaseTx::read(r)?)),
            TypeTag::AvmCreateAssetTx => Ok(AvmTx::CreateAsset {
                base: BaseTx::read(r)?,
                name: r.string()?,
                symbol: r.string()?,
                denomination: r.u8()?,
                states: r.vec(|r| {
                    Ok(InitialState {
                        fx_index: r.u32()?,
                        outs: r.vec(OutputVariant::read)?,
                    })
                })?,
            }),
            TypeTag::AvmOperationTx => Ok(AvmTx::Operation {
                base: BaseTx::read(r)?,
                ops: r.vec(|r| {
                    Ok(Operation {
                        asset: r.id()?,
                        utxo_ids: r.vec(UtxoId::read)?,
                        op: OperationVariant::read(r)?,
                    })
                })?,
            }),
            TypeTag::AvmImportTx => Ok(AvmTx::Import {
                base: BaseTx::read(r)?,
                source_chain: r.id()?,
                imported_ins: r.vec(TransferableInput::read)?,
            }),
            TypeTag::AvmExportTx => Ok(AvmTx::Export {
                base: BaseTx::read(r)?,
                destination_chain: r.id()?,
                exported_outs: r.vec(TransferableOutput::read)?,
            }),
            other => Err(DecodeError::UnexpectedType(format!(
                "{:?} as exchange transaction",
                other
            ))),
        }
    }
}

/// A signed exchange chain transaction with its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAvmTx {
    pub id: Id,
    pub unsigned: AvmTx,
    pub credentials: usize,
}

/// Decode one exchange chain container. The id is the hash of the full signed bytes.
pub fn decode_tx(bytes: &[u8], config: &CodecConfig) -> Result<SignedAvmTx, DecodeError> {
    let mut r = Reader::new(bytes, config)?;
    let unsigned = AvmTx::read(&mut r)?;
    let credentials = read_credentials(&mut r)?;
    r.finish()?;

    Ok(SignedAvmTx {
        id: Id::digest(bytes),
        unsigned,
        credentials,
    })
}
