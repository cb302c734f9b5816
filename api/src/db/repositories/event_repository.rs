use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::db::DbError;
use crate::entity::events::{Column, Model};
use crate::entity::prelude::Events;
use crate::models::EventSearch;

/// Repository for derived staking events
#[derive(Clone)]
pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Model, DbError> {
        Events::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Newest events first
    pub async fn search(&self, search: &EventSearch) -> Result<Vec<Model>, DbError> {
        let mut query = Events::find();

        if let Some(chain) = &search.chain {
            query = query.filter(Column::Chain.eq(chain.as_str()));
        }
        if let Some(scope) = &search.scope {
            query = query.filter(Column::Scope.eq(scope.as_str()));
        }
        if !search.types.is_empty() {
            query = query.filter(Column::EventType.is_in(search.types.iter().cloned()));
        }
        if let Some((item_id, item_type)) = &search.item {
            query = query
                .filter(Column::ItemId.eq(item_id.as_str()))
                .filter(Column::ItemType.eq(item_type.as_str()));
        }
        if let Some(start) = search.start_time {
            query = query.filter(Column::Timestamp.gte(start));
        }
        if let Some(end) = search.end_time {
            query = query.filter(Column::Timestamp.lte(end));
        }
        if let Some(start) = search.start_height {
            query = query.filter(Column::BlockHeight.gte(start));
        }
        if let Some(end) = search.end_height {
            query = query.filter(Column::BlockHeight.lte(end));
        }

        Ok(query
            .order_by_desc(Column::Timestamp)
            .limit(search.limit)
            .offset(search.offset)
            .all(&self.conn)
            .await?)
    }
}
