//! Prelude module for convenient imports

pub use super::assets::Entity as Assets;
pub use super::blocks::Entity as Blocks;
pub use super::chains::Entity as Chains;
pub use super::delegations::Entity as Delegations;
pub use super::events::Entity as Events;
pub use super::evm_receipts::Entity as EvmReceipts;
pub use super::evm_traces::Entity as EvmTraces;
pub use super::network_stats::Entity as NetworkStats;
pub use super::sync_statuses::Entity as SyncStatuses;
pub use super::transaction_outputs::Entity as TransactionOutputs;
pub use super::transactions::Entity as Transactions;
pub use super::validator_stats::Entity as ValidatorStats;
pub use super::validators::Entity as Validators;
