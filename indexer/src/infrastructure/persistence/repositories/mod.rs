pub mod address_repository;
pub mod delegation_repository;
pub mod event_repository;
pub mod evm_repository;
pub mod network_repository;
pub mod platform_repository;
pub mod sync_status_repository;
pub mod validator_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Delegation, NetworkMetric, StatsBucket, Validator, ValidatorSeq};
use crate::domain::ports::MetricsStore;
use crate::infrastructure::persistence::error::DbError;

pub use address_repository::AddressRepository;
pub use delegation_repository::{DelegationRepository, DELEGATIONS_BATCH_SIZE};
pub use event_repository::EventRepository;
pub use evm_repository::EvmRepository;
pub use network_repository::NetworkRepository;
pub use platform_repository::PlatformRepository;
pub use sync_status_repository::SyncStatusRepository;
pub use validator_repository::ValidatorRepository;

/// Collection of all repositories
#[derive(Clone)]
pub struct Repositories {
    /// Reward addresses
    pub address: AddressRepository,
    /// Delegations of the current validator set
    pub delegation: DelegationRepository,
    /// Derived staking events
    pub event: EventRepository,
    /// EVM receipts and traces
    pub evm: EvmRepository,
    /// Network metrics and stats
    pub network: NetworkRepository,
    /// Blocks, transactions, outputs and side entities
    pub platform: PlatformRepository,
    /// Stream cursors
    pub sync_status: SyncStatusRepository,
    /// Validators, samples and stats
    pub validator: ValidatorRepository,
}

impl Repositories {
    /// Create a new Repositories instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: AddressRepository,
        delegation: DelegationRepository,
        event: EventRepository,
        evm: EvmRepository,
        network: NetworkRepository,
        platform: PlatformRepository,
        sync_status: SyncStatusRepository,
        validator: ValidatorRepository,
    ) -> Self {
        Self {
            address,
            delegation,
            event,
            evm,
            network,
            platform,
            sync_status,
            validator,
        }
    }
}

#[async_trait]
impl MetricsStore for Repositories {
    async fn import_addresses(&self, addresses: &[String]) -> Result<(), DbError> {
        self.address.import(addresses).await.map(|_| ())
    }

    async fn import_validators(&self, validators: &[Validator]) -> Result<(), DbError> {
        self.validator.import(validators).await.map(|_| ())
    }

    async fn import_validator_seqs(&self, seqs: &[ValidatorSeq]) -> Result<(), DbError> {
        self.validator.import_sequences(seqs).await.map(|_| ())
    }

    async fn import_delegations(&self, delegations: &[Delegation]) -> Result<(), DbError> {
        self.delegation
            .import(delegations, DELEGATIONS_BATCH_SIZE)
            .await
            .map(|_| ())
    }

    async fn create_network_metric(&self, metric: &NetworkMetric) -> Result<(), DbError> {
        self.network.create_metric(metric).await
    }

    async fn create_network_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError> {
        self.network.create_stats(time, bucket).await.map(|_| ())
    }

    async fn create_validator_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError> {
        self.validator.create_stats(time, bucket).await.map(|_| ())
    }

    async fn purge_validator_seqs(&self, before: DateTime<Utc>) -> Result<u64, DbError> {
        self.validator.purge_sequences(before).await
    }
}
