use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "validator_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub time: chrono::DateTime<chrono::Utc>,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub bucket: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub node_id: String,
    pub uptime_min: f64,
    pub uptime_max: f64,
    pub uptime_avg: f64,
    pub stake_amount: i64,
    pub stake_percent: f64,
    pub delegations_count: i32,
    pub delegations_percent: f64,
    pub delegated_amount: i64,
    pub delegated_amount_percent: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
