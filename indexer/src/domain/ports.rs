//! Interfaces the sync engine needs from the node and the store.
//!
//! Workers hold these as `Arc<dyn ...>` so tests can swap in in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{
    Asset, Block, Chain, Delegation, Event, EventType, EvmReceipt, EvmTrace, NetworkMetric,
    Output, RewardsOwner, StatsBucket, SyncStatus, Transaction, Validator, ValidatorSeq,
};
use crate::infrastructure::node::types::{
    Blockchain, MinStakeResponse, Peer, TxFeeResponse, ValidatorsResponse,
};
use crate::infrastructure::node::NodeClientError;
use crate::infrastructure::persistence::error::DbError;

/// An opaque indexed unit of chain data, consumed once by a decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContainer {
    pub index: u64,
    pub id: String,
    pub bytes: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// Position and time of the newest item the node knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub index: u64,
    pub time: DateTime<Utc>,
}

/// Sequentially indexed containers of one chain
#[async_trait]
pub trait ContainerSource: Send + Sync {
    /// Index and time of the last accepted container
    async fn last_accepted(&self) -> Result<Tip, NodeClientError>;

    /// Up to `count` containers starting at `start`, ascending. Empty when nothing is new.
    async fn container_range(
        &self,
        start: u64,
        count: u64,
    ) -> Result<Vec<RawContainer>, NodeClientError>;
}

#[async_trait]
pub trait SyncStatusStore: Send + Sync {
    /// Fails with `DbError::NotFound` for a stream never seen before
    async fn get_sync_status(&self, id: &str) -> Result<SyncStatus, DbError>;

    async fn update_sync_status(&self, status: &SyncStatus) -> Result<(), DbError>;
}

/// Write side of the chain workers. Every call is conflict tolerant.
#[async_trait]
pub trait TxStore: Send + Sync {
    async fn create_block(&self, block: &Block) -> Result<(), DbError>;

    async fn create_transaction(&self, tx: &Transaction) -> Result<(), DbError>;

    async fn create_outputs(&self, outputs: &[Output]) -> Result<(), DbError>;

    /// Link each spent output id to the consuming transaction
    async fn create_inputs(&self, spent_ids: &[String], tx_id: &str) -> Result<(), DbError>;

    async fn mark_outputs_spent(
        &self,
        spent_ids: &[String],
        tx_id: &str,
        spent_at: DateTime<Utc>,
    ) -> Result<(), DbError>;

    async fn create_asset(&self, asset: &Asset) -> Result<(), DbError>;

    async fn create_chain(&self, chain: &Chain) -> Result<(), DbError>;

    async fn create_rewards_owner(&self, owner: &RewardsOwner) -> Result<(), DbError>;
}

/// Store access of the derived-event worker
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Newest persisted block of `chain`, `None` before the first block
    async fn last_block(&self, chain: &str) -> Result<Option<Block>, DbError>;

    /// Blocks of `chain` with height at least `start_height`, ascending
    async fn blocks_from(
        &self,
        chain: &str,
        start_height: u64,
        limit: u64,
    ) -> Result<Vec<Block>, DbError>;

    /// Transactions persisted with the given block hash
    async fn transactions_in_block(&self, block_id: &str) -> Result<Vec<Transaction>, DbError>;

    /// Fails with `DbError::NotFound` when the transaction is unknown
    async fn find_transaction(&self, id: &str) -> Result<Transaction, DbError>;

    /// Most recent event of `event_type` for `item_id` at or below `max_height`,
    /// excluding events derived from `exclude_tx`
    async fn last_event(
        &self,
        event_type: EventType,
        item_id: &str,
        max_height: u64,
        exclude_tx: &str,
    ) -> Result<Option<Event>, DbError>;

    /// Insert events, ignoring ids that already exist
    async fn create_events(&self, events: &[Event]) -> Result<(), DbError>;
}

/// An EVM transaction waiting for its receipt and trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvmTx {
    pub id: String,
    pub block_height: u64,
}

/// Receipt and trace calls of the contract chain node
#[async_trait]
pub trait EvmSource: Send + Sync {
    /// Height of the newest block
    async fn latest_height(&self) -> Result<u64, NodeClientError>;

    async fn receipt(&self, tx_hash: &str) -> Result<EvmReceipt, NodeClientError>;

    async fn trace(&self, tx_hash: &str) -> Result<EvmTrace, NodeClientError>;
}

#[async_trait]
pub trait EvmStore: Send + Sync {
    /// Height of the newest persisted block of `chain`
    async fn last_block_height(&self, chain: &str) -> Result<Option<u64>, DbError>;

    /// One page of EVM transactions with height in `[start_height, end_height]`,
    /// ascending by height then id
    async fn evm_transactions(
        &self,
        chain: &str,
        start_height: u64,
        end_height: u64,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PendingEvmTx>, DbError>;

    async fn save_receipts(&self, receipts: &[EvmReceipt]) -> Result<(), DbError>;

    async fn save_traces(&self, traces: &[EvmTrace]) -> Result<(), DbError>;
}

/// Node calls of the metrics pipeline
#[async_trait]
pub trait NetworkSource: Send + Sync {
    async fn network_name(&self) -> Result<String, NodeClientError>;

    async fn node_version(&self) -> Result<String, NodeClientError>;

    async fn current_validators(&self) -> Result<ValidatorsResponse, NodeClientError>;

    async fn pending_validators(&self) -> Result<ValidatorsResponse, NodeClientError>;

    async fn current_height(&self) -> Result<u64, NodeClientError>;

    async fn min_stake(&self) -> Result<MinStakeResponse, NodeClientError>;

    async fn blockchains(&self) -> Result<Vec<Blockchain>, NodeClientError>;

    async fn peers(&self) -> Result<Vec<Peer>, NodeClientError>;

    async fn tx_fee(&self) -> Result<TxFeeResponse, NodeClientError>;
}

/// Store writes of the metrics pipeline
#[async_trait]
pub trait MetricsStore: Send + Sync {
    async fn import_addresses(&self, addresses: &[String]) -> Result<(), DbError>;

    /// Replace the active validator set
    async fn import_validators(&self, validators: &[Validator]) -> Result<(), DbError>;

    async fn import_validator_seqs(&self, seqs: &[ValidatorSeq]) -> Result<(), DbError>;

    /// Replace the active delegation set
    async fn import_delegations(&self, delegations: &[Delegation]) -> Result<(), DbError>;

    async fn create_network_metric(&self, metric: &NetworkMetric) -> Result<(), DbError>;

    async fn create_network_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError>;

    async fn create_validator_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError>;

    /// Drop validator samples taken before `before`
    async fn purge_validator_seqs(&self, before: DateTime<Utc>) -> Result<u64, DbError>;
}
