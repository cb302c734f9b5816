use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::domain::models::Delegation;
use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::error::DbError;

/// Max delegations per insert statement
pub const DELEGATIONS_BATCH_SIZE: usize = 1000;

#[derive(Clone)]
pub struct DelegationRepository {
    conn: DatabaseConnection,
}

impl DelegationRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Mark every delegation inactive, then upsert `records` in batches
    pub async fn import(&self, records: &[Delegation], batch_size: usize) -> Result<u64, DbError> {
        bulk::exec(&self.conn, "UPDATE delegations SET active = FALSE", vec![]).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let rows: Vec<Row> = records
            .iter()
            .map(|d| {
                vec![
                    d.reference_id.clone().into(),
                    d.node_id.clone().into(),
                    d.stake_amount.into(),
                    d.potential_reward.into(),
                    d.reward_address.clone().into(),
                    d.active.into(),
                    d.active_start_time.into(),
                    d.active_end_time.into(),
                    d.first_height.into(),
                    d.last_height.into(),
                    now.into(),
                    now.into(),
                ]
            })
            .collect();

        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO delegations (
                   reference_id, node_id, stake_amount, potential_reward, reward_address,
                   active, active_start_time, active_end_time, first_height, last_height,
                   created_at, updated_at)
               VALUES @values
               ON CONFLICT (reference_id) DO UPDATE SET
                   stake_amount = EXCLUDED.stake_amount,
                   potential_reward = EXCLUDED.potential_reward,
                   active = EXCLUDED.active,
                   last_height = EXCLUDED.last_height,
                   updated_at = EXCLUDED.updated_at"#,
            rows,
            batch_size,
        )
        .await
    }
}
