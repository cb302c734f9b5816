//! SeaORM Entity for the transactions table
//!
//! `memo_tsv` is a generated column and is not mapped.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub reference_tx_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub chain: String,
    #[sea_orm(column_name = "type", column_type = "Text")]
    pub tx_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub block: Option<String>,
    pub block_height: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub memo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub memo_text: Option<String>,
    pub nonce: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub fee: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub source_chain: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub destination_chain: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub input_amounts: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub output_amounts: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
