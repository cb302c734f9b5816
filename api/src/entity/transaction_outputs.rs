// UTXOs created by transactions; spent ones carry the consuming transaction
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_outputs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub tx_id: String,
    #[sea_orm(column_type = "Text")]
    pub chain: String,
    #[sea_orm(column_name = "type", column_type = "Text", nullable)]
    #[serde(rename = "type")]
    pub output_type: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub asset: String,
    pub index: i64,
    pub locktime: i64,
    pub threshold: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub amount: Decimal,
    pub group: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub addresses: Json,
    pub stake: bool,
    pub reward: bool,
    pub spent: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub spent_tx_id: Option<String>,
    pub spent_at: Option<chrono::DateTime<chrono::Utc>>,
    #[sea_orm(column_type = "Text", nullable)]
    pub payload: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
