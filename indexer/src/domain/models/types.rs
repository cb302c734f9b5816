//! String-backed discriminants shared by the store, the workers and the API.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("invalid {} value: {}", stringify!($name), other)),
                }
            }
        }
    };
}

string_enum! {
    /// Transaction kind across the three chains
    pub enum TxType {
        XBase => "x_base",
        XImport => "x_import",
        XExport => "x_export",
        XCreateAsset => "x_create_asset",
        XOperation => "x_operation",
        PCreateChain => "p_create_chain",
        PCreateSubnet => "p_create_subnet",
        PAddSubnetValidator => "p_add_subnet_validator",
        PAdvanceTime => "p_advance_time",
        PRewardValidator => "p_reward_validator",
        PAddValidator => "p_add_validator",
        PAddDelegator => "p_add_delegator",
        PImport => "p_import",
        PExport => "p_export",
        CAtomicExport => "c_atomic_export",
        CAtomicImport => "c_atomic_import",
        CEvm => "c_evm",
    }
}

string_enum! {
    pub enum TxStatus {
        Accepted => "accepted",
        Rejected => "rejected",
        Reverted => "reverted",
    }
}

string_enum! {
    pub enum BlockType {
        Proposal => "proposal",
        Standard => "standard",
        Atomic => "atomic",
        Commit => "commit",
        Abort => "abort",
        Evm => "evm",
    }
}

string_enum! {
    pub enum OutputType {
        Transfer => "transfer",
        StakeableLock => "stakeable_lock",
        Reward => "reward",
        Mint => "mint",
        NftMint => "nft_mint",
        NftTransfer => "nft_transfer",
    }
}

string_enum! {
    pub enum AssetType {
        FixedCap => "fixed_cap",
        VariableCap => "variable_cap",
        Nft => "nft",
    }
}

string_enum! {
    pub enum EventScope {
        Staking => "staking",
        Rewards => "rewards",
        Network => "network",
    }
}

string_enum! {
    pub enum EventType {
        ValidatorAdded => "validator_added",
        ValidatorFinished => "validator_finished",
        ValidatorCommissionChanged => "validator_commission_changed",
        DelegatorAdded => "delegator_added",
        DelegatorFinished => "delegator_finished",
        SubnetValidatorAdded => "subnet_validator_added",
    }
}

string_enum! {
    pub enum ItemType {
        Validator => "validator",
        Delegator => "delegator",
    }
}

string_enum! {
    /// Aggregation window of the stats tables
    pub enum StatsBucket {
        Hour => "h",
        Day => "d",
    }
}

impl StatsBucket {
    /// First and last second of the bucket containing `time`
    pub fn range(&self, time: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            StatsBucket::Hour => time
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
            StatsBucket::Day => time
                .with_hour(0)
                .and_then(|t| t.with_minute(0))
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
        }
        .unwrap_or(time);
        let span = match self {
            StatsBucket::Hour => Duration::hours(1),
            StatsBucket::Day => Duration::days(1),
        };
        (start, start + span - Duration::seconds(1))
    }
}

impl TxType {
    /// Plain EVM transactions carry no inputs or outputs
    pub fn uses_utxos(&self) -> bool {
        !matches!(self, TxType::CEvm)
    }
}
