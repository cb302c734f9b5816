// Validator set as of the latest metrics pipeline run
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "validators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub node_id: String,
    pub stake_amount: i64,
    pub stake_percent: f64,
    pub potential_reward: i64,
    #[sea_orm(column_type = "Text")]
    pub reward_address: String,
    pub active: bool,
    pub active_start_time: chrono::DateTime<chrono::Utc>,
    pub active_end_time: chrono::DateTime<chrono::Utc>,
    pub active_progress_percent: f64,
    pub uptime: f64,
    pub delegations_count: i32,
    pub delegations_percent: f64,
    pub delegated_amount: i64,
    pub delegated_amount_percent: f64,
    pub delegation_fee: f64,
    pub capacity: i64,
    pub capacity_percent: f64,
    pub first_height: i64,
    pub last_height: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
