use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::fmt;

use super::platform_repository::PlatformRepository;
use crate::domain::models::{Block, Event, EventType, Transaction};
use crate::domain::ports::EventStore;
use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::entities::events;
use crate::infrastructure::persistence::error::DbError;

const EVENT_CHUNK: usize = 100;

/// Repository for derived staking events
#[derive(Clone)]
pub struct EventRepository {
    conn: DatabaseConnection,
    platform: PlatformRepository,
}

impl fmt::Debug for EventRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRepository").finish_non_exhaustive()
    }
}

fn event_from_model(model: events::Model) -> Result<Event, DbError> {
    Ok(Event {
        scope: model.scope.parse().map_err(DbError::Other)?,
        event_type: model.event_type.parse().map_err(DbError::Other)?,
        item_type: model.item_type.parse().map_err(DbError::Other)?,
        id: model.id,
        chain: model.chain,
        block_hash: model.block_hash,
        block_height: model.block_height.max(0) as u64,
        tx_hash: model.tx_hash,
        timestamp: model.timestamp,
        item_id: model.item_id,
        data: model.data.as_object().cloned().unwrap_or_default(),
    })
}

impl EventRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            platform: PlatformRepository::new(conn.clone()),
            conn,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Event, DbError> {
        let model = events::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)?;
        event_from_model(model)
    }

    /// Insert events. Ids already present are skipped.
    pub async fn insert_events(&self, events: &[Event]) -> Result<u64, DbError> {
        if events.is_empty() {
            return Ok(0);
        }

        let rows: Vec<Row> = events
            .iter()
            .map(|e| {
                vec![
                    e.id.clone().into(),
                    e.chain.clone().into(),
                    e.block_hash.clone().into(),
                    (e.block_height as i64).into(),
                    e.tx_hash.clone().into(),
                    e.timestamp.into(),
                    e.scope.as_str().into(),
                    e.event_type.as_str().into(),
                    e.item_id.clone().into(),
                    e.item_type.as_str().into(),
                    serde_json::Value::Object(e.data.clone()).into(),
                ]
            })
            .collect();

        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO events (
                   id, chain, block_hash, block_height, tx_hash, "timestamp", scope, "type",
                   item_id, item_type, data)
               VALUES @values
               ON CONFLICT (id) DO NOTHING"#,
            rows,
            EVENT_CHUNK,
        )
        .await
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn last_block(&self, chain: &str) -> Result<Option<Block>, DbError> {
        self.platform.last_block(chain).await
    }

    async fn blocks_from(
        &self,
        chain: &str,
        start_height: u64,
        limit: u64,
    ) -> Result<Vec<Block>, DbError> {
        self.platform.blocks_from(chain, start_height, limit).await
    }

    async fn transactions_in_block(&self, block_id: &str) -> Result<Vec<Transaction>, DbError> {
        self.platform.transactions_in_block(block_id).await
    }

    async fn find_transaction(&self, id: &str) -> Result<Transaction, DbError> {
        self.platform.find_transaction(id).await
    }

    async fn last_event(
        &self,
        event_type: EventType,
        item_id: &str,
        max_height: u64,
        exclude_tx: &str,
    ) -> Result<Option<Event>, DbError> {
        events::Entity::find()
            .filter(events::Column::EventType.eq(event_type.as_str()))
            .filter(events::Column::ItemId.eq(item_id))
            .filter(events::Column::BlockHeight.lte(max_height as i64))
            .filter(events::Column::TxHash.ne(exclude_tx))
            .order_by_desc(events::Column::BlockHeight)
            .order_by_desc(events::Column::Timestamp)
            .one(&self.conn)
            .await?
            .map(event_from_model)
            .transpose()
    }

    async fn create_events(&self, events: &[Event]) -> Result<(), DbError> {
        self.insert_events(events).await.map(|_| ())
    }
}
