use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::db::DbError;
use crate::entity::blocks::{Column, Model};
use crate::entity::prelude::Blocks;
use crate::models::{BlockOrder, BlockSearch};

/// Repository for block reads
#[derive(Clone)]
pub struct BlockRepository {
    conn: DatabaseConnection,
}

impl BlockRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Model, DbError> {
        Blocks::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn search(&self, search: &BlockSearch) -> Result<Vec<Model>, DbError> {
        let mut query = Blocks::find().filter(Column::Chain.eq(search.chain.as_str()));

        if let Some(start) = search.start_height {
            query = query.filter(Column::Height.gte(start));
        }
        if let Some(end) = search.end_height {
            query = query.filter(Column::Height.lte(end));
        }
        if !search.types.is_empty() {
            query = query.filter(Column::BlockType.is_in(search.types.iter().cloned()));
        }

        query = match search.order {
            BlockOrder::HeightAsc => query.order_by_asc(Column::Height),
            BlockOrder::HeightDesc => query.order_by_desc(Column::Height),
        };

        Ok(query
            .limit(search.limit)
            .offset(search.offset)
            .all(&self.conn)
            .await?)
    }
}
