//! Entity module for database models

pub mod assets;
pub mod blocks;
pub mod chains;
pub mod delegations;
pub mod events;
pub mod evm_receipts;
pub mod evm_traces;
pub mod network_stats;
pub mod prelude;
pub mod sync_statuses;
pub mod transaction_outputs;
pub mod transactions;
pub mod validator_stats;
pub mod validators;
