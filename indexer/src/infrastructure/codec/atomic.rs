//! Atomic transactions carried in the extra data of contract chain blocks.

use crate::domain::errors::DecodeError;

use super::components::{read_credentials, TransferableInput, TransferableOutput};
use super::config::{CodecConfig, TypeTag};
use super::ids::Id;
use super::reader::Reader;

/// Credit of an EVM account from an imported UTXO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmOutput {
    pub address: [u8; 20],
    pub amount: u64,
    pub asset: Id,
}

/// Debit of an EVM account into an exported UTXO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmInput {
    pub address: [u8; 20],
    pub amount: u64,
    pub asset: Id,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicTx {
    Import {
        network_id: u32,
        blockchain_id: Id,
        source_chain: Id,
        imported_ins: Vec<TransferableInput>,
        outs: Vec<EvmOutput>,
    },
    Export {
        network_id: u32,
        blockchain_id: Id,
        destination_chain: Id,
        ins: Vec<EvmInput>,
        exported_outs: Vec<TransferableOutput>,
    },
}

impl AtomicTx {
    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.type_tag()? {
            TypeTag::EvmImportTx => Ok(AtomicTx::Import {
                network_id: r.u32()?,
                blockchain_id: r.id()?,
                source_chain: r.id()?,
                imported_ins: r.vec(TransferableInput::read)?,
                outs: r.vec(|r| {
                    Ok(EvmOutput {
                        address: r.short_id()?.0,
                        amount: r.u64()?,
                        asset: r.id()?,
                    })
                })?,
            }),
            TypeTag::EvmExportTx => Ok(AtomicTx::Export {
                network_id: r.u32()?,
                blockchain_id: r.id()?,
                destination_chain: r.id()?,
                ins: r.vec(|r| {
                    Ok(EvmInput {
                        address: r.short_id()?.0,
                        amount: r.u64()?,
                        asset: r.id()?,
                        nonce: r.u64()?,
                    })
                })?,
                exported_outs: r.vec(TransferableOutput::read)?,
            }),
            other => Err(DecodeError::UnexpectedType(format!(
                "{:?} as atomic transaction",
                other
            ))),
        }
    }

    pub fn blockchain_id(&self) -> Id {
        match self {
            AtomicTx::Import { blockchain_id, .. } | AtomicTx::Export { blockchain_id, .. } => {
                *blockchain_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAtomicTx {
    pub id: Id,
    pub unsigned: AtomicTx,
}

fn read_signed(r: &mut Reader<'_>) -> Result<SignedAtomicTx, DecodeError> {
    let start = r.position();
    let unsigned = AtomicTx::read(r)?;
    read_credentials(r)?;
    let end = r.position();

    let mut signed = Vec::with_capacity(2 + end - start);
    signed.extend_from_slice(&r.version().to_be_bytes());
    signed.extend_from_slice(r.slice(start, end));

    Ok(SignedAtomicTx {
        id: Id::digest(&signed),
        unsigned,
    })
}

/// Decode block extra data. Before the batch upgrade a block carries a single
/// transaction; afterwards a length-prefixed list.
pub fn decode_ext_data(
    bytes: &[u8],
    batched: bool,
    config: &CodecConfig,
) -> Result<Vec<SignedAtomicTx>, DecodeError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut r = Reader::new(bytes, config)?;
    let txs = if batched {
        r.vec(read_signed)?
    } else {
        vec![read_signed(&mut r)?]
    };
    r.finish()?;
    Ok(txs)
}
