// Database repository management

mod asset_repository;
mod block_repository;
mod chain_repository;
mod event_repository;
mod evm_repository;
mod network_repository;
mod transaction_repository;
mod validator_repository;

pub use asset_repository::AssetRepository;
pub use block_repository::BlockRepository;
pub use chain_repository::ChainRepository;
pub use event_repository::EventRepository;
pub use evm_repository::EvmRepository;
pub use network_repository::NetworkRepository;
pub use transaction_repository::TransactionRepository;
pub use validator_repository::ValidatorRepository;

use sea_orm::DatabaseConnection;

/// Container for all database repositories
#[derive(Clone)]
pub struct Repositories {
    pub assets: AssetRepository,
    pub blocks: BlockRepository,
    pub chains: ChainRepository,
    pub events: EventRepository,
    pub evm: EvmRepository,
    pub network: NetworkRepository,
    pub transactions: TransactionRepository,
    pub validators: ValidatorRepository,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            assets: AssetRepository::new(conn.clone()),
            blocks: BlockRepository::new(conn.clone()),
            chains: ChainRepository::new(conn.clone()),
            events: EventRepository::new(conn.clone()),
            evm: EvmRepository::new(conn.clone()),
            network: NetworkRepository::new(conn.clone()),
            transactions: TransactionRepository::new(conn.clone()),
            validators: ValidatorRepository::new(conn),
        }
    }
}
