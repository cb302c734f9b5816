//! SeaORM Entity for the events table

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub chain: String,
    #[sea_orm(column_type = "Text")]
    pub block_hash: String,
    pub block_height: i64,
    #[sea_orm(column_type = "Text")]
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    pub scope: String,
    #[sea_orm(column_name = "type", column_type = "Text")]
    pub event_type: String,
    #[sea_orm(column_type = "Text")]
    pub item_id: String,
    #[sea_orm(column_type = "Text")]
    pub item_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
