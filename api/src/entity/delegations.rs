// Delegation records refreshed by every metrics pipeline run
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delegations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub reference_id: String,
    #[sea_orm(column_type = "Text")]
    pub node_id: String,
    pub stake_amount: i64,
    pub potential_reward: i64,
    #[sea_orm(column_type = "Text")]
    pub reward_address: String,
    pub active: bool,
    pub active_start_time: chrono::DateTime<chrono::Utc>,
    pub active_end_time: chrono::DateTime<chrono::Utc>,
    pub first_height: i64,
    pub last_height: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
