use sea_orm::DatabaseConnection;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{
    AddressRepository, DelegationRepository, EventRepository, EvmRepository, NetworkRepository,
    PlatformRepository, Repositories, SyncStatusRepository, ValidatorRepository,
};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories over the pool's connection
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();

        Repositories::new(
            Self::create_address_repository(conn.clone()),
            Self::create_delegation_repository(conn.clone()),
            Self::create_event_repository(conn.clone()),
            Self::create_evm_repository(conn.clone()),
            Self::create_network_repository(conn.clone()),
            Self::create_platform_repository(conn.clone()),
            Self::create_sync_status_repository(conn.clone()),
            Self::create_validator_repository(conn),
        )
    }

    pub fn create_address_repository(conn: DatabaseConnection) -> AddressRepository {
        AddressRepository::new(conn)
    }

    pub fn create_delegation_repository(conn: DatabaseConnection) -> DelegationRepository {
        DelegationRepository::new(conn)
    }

    /// Create an event repository
    pub fn create_event_repository(conn: DatabaseConnection) -> EventRepository {
        EventRepository::new(conn)
    }

    pub fn create_evm_repository(conn: DatabaseConnection) -> EvmRepository {
        EvmRepository::new(conn)
    }

    pub fn create_network_repository(conn: DatabaseConnection) -> NetworkRepository {
        NetworkRepository::new(conn)
    }

    /// Create the repository for blocks, transactions and UTXOs
    pub fn create_platform_repository(conn: DatabaseConnection) -> PlatformRepository {
        PlatformRepository::new(conn)
    }

    pub fn create_sync_status_repository(conn: DatabaseConnection) -> SyncStatusRepository {
        SyncStatusRepository::new(conn)
    }

    pub fn create_validator_repository(conn: DatabaseConnection) -> ValidatorRepository {
        ValidatorRepository::new(conn)
    }
}
