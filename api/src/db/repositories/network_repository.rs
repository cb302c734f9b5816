use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::db::DbError;
use crate::entity::network_stats::{Column, Model};
use crate::entity::prelude::NetworkStats;
use crate::models::StatsBucket;

/// Repository for bucketed network stats
#[derive(Clone)]
pub struct NetworkRepository {
    conn: DatabaseConnection,
}

impl NetworkRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Latest `limit` buckets, newest first
    pub async fn stats(&self, bucket: StatsBucket, limit: u64) -> Result<Vec<Model>, DbError> {
        Ok(NetworkStats::find()
            .filter(Column::Bucket.eq(bucket.as_str()))
            .order_by_desc(Column::Time)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }
}
