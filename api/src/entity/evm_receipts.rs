use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evm_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub receipt_type: i16,
    pub status: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub contract_address: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    #[serde(skip_serializing)]
    pub logs: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
