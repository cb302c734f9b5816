// Hourly and daily network aggregates
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "network_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub time: chrono::DateTime<chrono::Utc>,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub bucket: String,
    pub height_change: i64,
    pub peers: i32,
    pub blockchains: i32,
    pub active_validators: i32,
    pub pending_validators: i32,
    pub validator_uptime: f64,
    pub active_delegations: i32,
    pub pending_delegations: i32,
    pub min_validator_stake: i64,
    pub min_delegation_stake: i64,
    pub tx_fee: i64,
    pub create_tx_fee: i64,
    pub total_staked: i64,
    pub total_delegated: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
