use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::models::SyncStatus;
use crate::domain::ports::SyncStatusStore;
use crate::infrastructure::persistence::entities::sync_statuses;
use crate::infrastructure::persistence::error::DbError;

/// Repository for the sync cursors of every stream
#[derive(Clone)]
pub struct SyncStatusRepository {
    conn: DatabaseConnection,
}

fn to_domain(model: sync_statuses::Model) -> SyncStatus {
    SyncStatus {
        id: model.id,
        index_id: model.index_id.max(0) as u64,
        index_time: model.index_time,
        tip_id: model.tip_id.max(0) as u64,
        tip_time: model.tip_time,
    }
}

impl SyncStatusRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Cursor of `id`, `DbError::NotFound` when the stream was never synced
    pub async fn find(&self, id: &str) -> Result<SyncStatus, DbError> {
        sync_statuses::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .map(to_domain)
            .ok_or(DbError::NotFound)
    }

    /// Insert or update a cursor
    pub async fn save(&self, status: &SyncStatus) -> Result<(), DbError> {
        let now: DateTime<Utc> = Utc::now();
        let model = sync_statuses::ActiveModel {
            id: Set(status.id.clone()),
            index_id: Set(status.index_id as i64),
            index_time: Set(status.index_time),
            tip_id: Set(status.tip_id as i64),
            tip_time: Set(status.tip_time),
            created_at: Set(now),
            updated_at: Set(now),
        };

        sync_statuses::Entity::insert(model)
            .on_conflict(
                OnConflict::column(sync_statuses::Column::Id)
                    .update_columns([
                        sync_statuses::Column::IndexId,
                        sync_statuses::Column::IndexTime,
                        sync_statuses::Column::TipId,
                        sync_statuses::Column::TipTime,
                        sync_statuses::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn all(&self) -> Result<Vec<SyncStatus>, DbError> {
        let rows = sync_statuses::Entity::find()
            .order_by_asc(sync_statuses::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }
}

#[async_trait]
impl SyncStatusStore for SyncStatusRepository {
    async fn get_sync_status(&self, id: &str) -> Result<SyncStatus, DbError> {
        self.find(id).await
    }

    async fn update_sync_status(&self, status: &SyncStatus) -> Result<(), DbError> {
        self.save(status).await
    }
}
