use std::collections::HashMap;

use crate::domain::errors::DecodeError;

/// Every concrete type the chains can put behind an interface on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    // exchange chain transactions
    AvmBaseTx,
    AvmCreateAssetTx,
    AvmOperationTx,
    AvmImportTx,
    AvmExportTx,
    // secp256k1 fx
    SecpTransferInput,
    SecpMintOutput,
    SecpTransferOutput,
    SecpMintOperation,
    SecpCredential,
    SecpInput,
    SecpOutputOwners,
    // nft fx
    NftMintOutput,
    NftTransferOutput,
    NftMintOperation,
    NftTransferOperation,
    NftCredential,
    // property fx
    PropertyMintOutput,
    PropertyOwnedOutput,
    PropertyMintOperation,
    PropertyBurnOperation,
    PropertyCredential,
    // platform chain blocks
    PvmProposalBlock,
    PvmAbortBlock,
    PvmCommitBlock,
    PvmStandardBlock,
    PvmAtomicBlock,
    // platform chain transactions
    PvmAddValidatorTx,
    PvmAddSubnetValidatorTx,
    PvmAddDelegatorTx,
    PvmCreateChainTx,
    PvmCreateSubnetTx,
    PvmImportTx,
    PvmExportTx,
    PvmAdvanceTimeTx,
    PvmRewardValidatorTx,
    StakeableLockIn,
    StakeableLockOut,
    // contract chain atomic transactions
    EvmImportTx,
    EvmExportTx,
}

const SECP_TYPES: [TypeTag; 5] = [
    TypeTag::SecpTransferInput,
    TypeTag::SecpMintOutput,
    TypeTag::SecpTransferOutput,
    TypeTag::SecpMintOperation,
    TypeTag::SecpCredential,
];

const NFT_TYPES: [TypeTag; 5] = [
    TypeTag::NftMintOutput,
    TypeTag::NftTransferOutput,
    TypeTag::NftMintOperation,
    TypeTag::NftTransferOperation,
    TypeTag::NftCredential,
];

const PROPERTY_TYPES: [TypeTag; 5] = [
    TypeTag::PropertyMintOutput,
    TypeTag::PropertyOwnedOutput,
    TypeTag::PropertyMintOperation,
    TypeTag::PropertyBurnOperation,
    TypeTag::PropertyCredential,
];

const AVM_TX_TYPES: [TypeTag; 5] = [
    TypeTag::AvmBaseTx,
    TypeTag::AvmCreateAssetTx,
    TypeTag::AvmOperationTx,
    TypeTag::AvmImportTx,
    TypeTag::AvmExportTx,
];

/// Type registry of one chain's codec.
///
/// Built explicitly at startup and handed to the decoders; each supported
/// codec version has its own type id table.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    name: &'static str,
    versions: HashMap<u16, HashMap<u32, TypeTag>>,
}

impl CodecConfig {
    fn linear(types: &[Option<TypeTag>]) -> HashMap<u32, TypeTag> {
        types
            .iter()
            .enumerate()
            .filter_map(|(idx, tag)| tag.map(|t| (idx as u32, t)))
            .collect()
    }

    /// Exchange chain: version 0 numbers types linearly, version 1 by fx group
    pub fn avm() -> Self {
        let v0: Vec<Option<TypeTag>> = AVM_TX_TYPES
            .iter()
            .chain(SECP_TYPES.iter())
            .chain(NFT_TYPES.iter())
            .chain(PROPERTY_TYPES.iter())
            .map(|t| Some(*t))
            .collect();

        let mut v1 = HashMap::new();
        for (group, types) in [AVM_TX_TYPES, SECP_TYPES, NFT_TYPES, PROPERTY_TYPES]
            .iter()
            .enumerate()
        {
            for (idx, tag) in types.iter().enumerate() {
                v1.insert(((group as u32) << 16) | idx as u32, *tag);
            }
        }

        let mut versions = HashMap::new();
        versions.insert(0, Self::linear(&v0));
        versions.insert(1, v1);
        Self {
            name: "avm",
            versions,
        }
    }

    /// Platform chain
    pub fn pvm() -> Self {
        use TypeTag::*;
        let types = [
            PvmProposalBlock,
            PvmAbortBlock,
            PvmCommitBlock,
            PvmStandardBlock,
            PvmAtomicBlock,
            SecpTransferInput,
            SecpMintOutput,
            SecpTransferOutput,
            SecpMintOperation,
            SecpCredential,
            SecpInput,
            SecpOutputOwners,
            PvmAddValidatorTx,
            PvmAddSubnetValidatorTx,
            PvmAddDelegatorTx,
            PvmCreateChainTx,
            PvmCreateSubnetTx,
            PvmImportTx,
            PvmExportTx,
            PvmAdvanceTimeTx,
            PvmRewardValidatorTx,
            StakeableLockIn,
            StakeableLockOut,
        ];
        let table: Vec<Option<TypeTag>> = types.iter().map(|t| Some(*t)).collect();

        let mut versions = HashMap::new();
        versions.insert(0, Self::linear(&table));
        Self {
            name: "pvm",
            versions,
        }
    }

    /// Atomic transactions embedded in contract chain blocks
    pub fn atomic() -> Self {
        use TypeTag::*;
        let table = [
            Some(EvmImportTx),
            Some(EvmExportTx),
            None,
            None,
            None,
            Some(SecpTransferInput),
            Some(SecpMintOutput),
            Some(SecpTransferOutput),
            Some(SecpMintOperation),
            Some(SecpCredential),
            Some(SecpInput),
            Some(SecpOutputOwners),
        ];

        let mut versions = HashMap::new();
        versions.insert(0, Self::linear(&table));
        Self {
            name: "atomic",
            versions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn supports(&self, version: u16) -> bool {
        self.versions.contains_key(&version)
    }

    pub fn resolve(&self, version: u16, type_id: u32) -> Result<TypeTag, DecodeError> {
        self.versions
            .get(&version)
            .ok_or(DecodeError::UnsupportedVersion(version))?
            .get(&type_id)
            .copied()
            .ok_or(DecodeError::UnknownTypeId { version, type_id })
    }
}
