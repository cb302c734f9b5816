//! Exchange chain containers: one signed transaction each, no block.

use serde_json::Value;

use super::shared::{finalize, prepare_input, prepare_inputs, prepare_output, prepare_outputs};
use super::{ContainerDecoder, DecodedContainer, MapperContext};
use crate::domain::errors::DecodeError;
use crate::domain::models::{Asset, AssetType, Output, Transaction, TxType};
use crate::domain::ports::RawContainer;
use crate::infrastructure::codec::avm::{self, AvmTx, InitialState};
use crate::infrastructure::codec::components::OutputVariant;
use crate::infrastructure::codec::{CodecConfig, Id};

pub struct XChainMapper {
    ctx: MapperContext,
    codec: CodecConfig,
}

impl XChainMapper {
    pub fn new(ctx: MapperContext, codec: CodecConfig) -> Self {
        Self { ctx, codec }
    }

    fn map_tx(&self, id: &Id, unsigned: &AvmTx) -> Result<(Transaction, Option<Asset>), DecodeError> {
        let base = unsigned.base();
        let mut inputs = prepare_inputs(&base.ins);
        let mut outputs = prepare_outputs(&self.ctx, &base.outs, id, 0)?;
        let mut asset = None;

        let tx_type = match unsigned {
            AvmTx::Base(_) => TxType::XBase,
            AvmTx::CreateAsset {
                name,
                symbol,
                denomination,
                states,
                ..
            } => {
                let asset_id = id.to_string();
                let mut index = outputs.len() as u64;
                for state in states {
                    for out in &state.outs {
                        outputs.push(prepare_output(&self.ctx, out, &asset_id, index, id)?);
                        index += 1;
                    }
                }
                asset = Some(Asset {
                    asset_id,
                    asset_type: asset_type(states),
                    name: name.clone(),
                    symbol: symbol.clone(),
                    denomination: *denomination,
                });
                TxType::XCreateAsset
            }
            AvmTx::Operation { ops, .. } => {
                let mut index = outputs.len() as u64;
                for op in ops {
                    let op_asset = op.asset.to_string();
                    for utxo in &op.utxo_ids {
                        let mut spent =
                            Output::new(utxo.output_id().to_string(), utxo.tx_id.to_string(), op_asset.clone());
                        spent.index = utxo.output_index as u64;
                        inputs.push(spent);
                    }
                    for out in op.op.outputs() {
                        outputs.push(prepare_output(&self.ctx, &out, &op_asset, index, id)?);
                        index += 1;
                    }
                }
                TxType::XOperation
            }
            AvmTx::Import { imported_ins, .. } => {
                inputs.extend(imported_ins.iter().map(prepare_input));
                TxType::XImport
            }
            AvmTx::Export { exported_outs, .. } => {
                let start = outputs.len() as u64;
                outputs.extend(prepare_outputs(&self.ctx, exported_outs, id, start)?);
                TxType::XExport
            }
        };

        let mut tx = Transaction::new(id.to_string(), tx_type);
        tx.set_raw_memo(&base.memo);
        tx.inputs = inputs;
        tx.outputs = outputs;

        match unsigned {
            AvmTx::Import { source_chain, .. } => {
                tx.source_chain = Some(source_chain.to_string());
            }
            AvmTx::Export {
                destination_chain, ..
            } => {
                tx.destination_chain = Some(destination_chain.to_string());
            }
            AvmTx::CreateAsset { .. } => {
                if let Some(asset) = &asset {
                    let supply: u64 = tx
                        .outputs
                        .iter()
                        .filter(|o| o.asset == asset.asset_id)
                        .map(|o| o.amount)
                        .sum();
                    tx.set_meta("asset_id", asset.asset_id.clone());
                    tx.set_meta("asset_name", asset.name.clone());
                    tx.set_meta("asset_symbol", asset.symbol.clone());
                    tx.set_meta("asset_denomination", asset.denomination);
                    tx.set_meta("asset_type", asset.asset_type.as_str());
                    tx.set_meta("asset_initial_supply", Value::String(supply.to_string()));
                }
            }
            AvmTx::Base(_) | AvmTx::Operation { .. } => {}
        }

        Ok((tx, asset))
    }
}

/// Nft outputs make an nft, mint outputs a variable cap asset, anything else is fixed
fn asset_type(states: &[InitialState]) -> AssetType {
    let outs = || states.iter().flat_map(|s| s.outs.iter());
    if outs().any(|o| {
        matches!(
            o,
            OutputVariant::NftMint { .. } | OutputVariant::NftTransfer { .. }
        )
    }) {
        AssetType::Nft
    } else if outs().any(|o| matches!(o, OutputVariant::SecpMint(_))) {
        AssetType::VariableCap
    } else {
        AssetType::FixedCap
    }
}

impl ContainerDecoder for XChainMapper {
    fn chain(&self) -> &str {
        &self.ctx.chain_id
    }

    fn decode(&self, container: &RawContainer) -> Result<DecodedContainer, DecodeError> {
        let signed = avm::decode_tx(&container.bytes, &self.codec)?;
        let (mut tx, asset) = self.map_tx(&signed.id, &signed.unsigned)?;
        finalize(&self.ctx, &mut tx, container.timestamp, None);

        Ok(DecodedContainer {
            block: None,
            transactions: vec![tx],
            assets: asset.into_iter().collect(),
            chains: Vec::new(),
            rewards_owners: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::codec::test_bytes::Bytes;
    use crate::infrastructure::codec::ShortId;
    use chrono::{TimeZone, Utc};

    fn mapper(native: &Id) -> XChainMapper {
        let ctx = MapperContext::new("x-chain", 1, native.to_string(), "avax").unwrap();
        XChainMapper::new(ctx, CodecConfig::avm())
    }

    fn container(bytes: Vec<u8>) -> RawContainer {
        RawContainer {
            index: 4,
            id: "c".to_string(),
            bytes,
            timestamp: Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn base_tx_spends_input_and_pays_fee() {
        let avax = Id::digest(b"avax");
        let prev = Id::digest(b"prev");
        let chain = Id::digest(b"chain");
        let addr = ShortId([9u8; 20]);

        let outs = Bytes::default().id(&avax).transfer_output(7, 900, &addr).build();
        let ins = Bytes::default()
            .id(&prev)
            .u32(1)
            .id(&avax)
            .transfer_input(5, 1_000)
            .build();
        let bytes = Bytes::version(0)
            .u32(0)
            .base_tx(&chain, (1, outs), (1, ins), b"memo")
            .u32(0)
            .build();

        let decoded = mapper(&avax).decode(&container(bytes.clone())).unwrap();
        assert!(decoded.block.is_none());
        let tx = &decoded.transactions[0];
        let id = Id::digest(&bytes);

        assert_eq!(tx.id, id.to_string());
        assert_eq!(tx.tx_type, TxType::XBase);
        assert_eq!(tx.chain, "x-chain");
        assert_eq!(tx.fee, 100);
        assert_eq!(tx.memo_text.as_deref(), Some("memo"));
        assert_eq!(tx.outputs[0].id, id.prefix(0).to_string());
        assert_eq!(tx.outputs[0].chain, "x-chain");
        assert_eq!(tx.spent_output_ids(), vec![prev.prefix(1).to_string()]);
    }

    #[test]
    fn create_asset_registers_asset_and_initial_outputs() {
        let avax = Id::digest(b"avax");
        let chain = Id::digest(b"chain");
        let addr = ShortId([3u8; 20]);

        let bytes = Bytes::version(0)
            .u32(1)
            .base_tx(&chain, (0, vec![]), (0, vec![]), b"")
            .string("Token")
            .string("TOK")
            .u8(6)
            .u32(1)
            .u32(0)
            .u32(1)
            .transfer_output(7, 5_000, &addr)
            .u32(0)
            .build();

        let decoded = mapper(&avax).decode(&container(bytes.clone())).unwrap();
        let id = Id::digest(&bytes);
        let asset = &decoded.assets[0];
        assert_eq!(asset.asset_id, id.to_string());
        assert_eq!(asset.asset_type, AssetType::FixedCap);
        assert_eq!(asset.symbol, "TOK");
        assert_eq!(asset.denomination, 6);

        let tx = &decoded.transactions[0];
        assert_eq!(tx.tx_type, TxType::XCreateAsset);
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].asset, id.to_string());
        assert_eq!(tx.outputs[0].amount, 5_000);
        assert_eq!(tx.meta_str("asset_initial_supply"), Some("5000"));
        assert_eq!(tx.fee, 0);
    }

    #[test]
    fn property_output_fails_decoding() {
        let avax = Id::digest(b"avax");
        let chain = Id::digest(b"chain");
        let addr = ShortId([3u8; 20]);
        let outs = Bytes::default()
            .id(&avax)
            .u32(15)
            .u64(0)
            .u32(1)
            .u32(1)
            .short_id(&addr)
            .build();
        let bytes = Bytes::version(0)
            .u32(0)
            .base_tx(&chain, (1, outs), (0, vec![]), b"")
            .u32(0)
            .build();

        let err = mapper(&avax).decode(&container(bytes)).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownOutputType(_)));
    }
}
