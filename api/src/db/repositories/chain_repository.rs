use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::db::DbError;
use crate::entity::prelude::{Chains, SyncStatuses};
use crate::entity::{chains, sync_statuses};

/// Repository for known chains and their sync progress
#[derive(Clone)]
pub struct ChainRepository {
    conn: DatabaseConnection,
}

impl ChainRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_all(&self) -> Result<Vec<chains::Model>, DbError> {
        Ok(Chains::find()
            .order_by_asc(chains::Column::Name)
            .all(&self.conn)
            .await?)
    }

    pub async fn sync_statuses(&self) -> Result<Vec<sync_statuses::Model>, DbError> {
        Ok(SyncStatuses::find()
            .order_by_asc(sync_statuses::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Round trip used by the health check
    pub async fn ping(&self) -> Result<(), DbError> {
        self.conn
            .ping()
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))
    }
}
