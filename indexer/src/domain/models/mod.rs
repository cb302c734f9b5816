pub mod asset;
pub mod block;
pub mod chain;
pub mod event;
pub mod evm;
pub mod rewards_owner;
pub mod sync_status;
pub mod transaction;
pub mod types;
pub mod validator;

pub use asset::Asset;
pub use block::Block;
pub use chain::Chain;
pub use event::Event;
pub use evm::{EvmLog, EvmReceipt, EvmTrace};
pub use rewards_owner::{RewardsOwner, RewardsOwnerAddress, RewardsOwnerOutput};
pub use sync_status::SyncStatus;
pub use transaction::{Output, Transaction, TransactionTypeCount};
pub use types::{
    AssetType, BlockType, EventScope, EventType, ItemType, OutputType, StatsBucket, TxStatus,
    TxType,
};
pub use validator::{
    Address, Delegation, NetworkMetric, Validator, ValidatorSeq, ValidatorStat,
};
