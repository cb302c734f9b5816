use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};

use crate::domain::models::{StatsBucket, Validator, ValidatorSeq};
use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::error::DbError;

const VALIDATOR_CHUNK: usize = 500;

/// Repository for validators, their periodic samples and bucketed stats
#[derive(Clone)]
pub struct ValidatorRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct HeightRow {
    height: Option<i64>,
}

impl ValidatorRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Highest platform height seen by any validator sample
    pub async fn last_height(&self) -> Result<i64, DbError> {
        let row = HeightRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT MAX(last_height) AS height FROM validators".to_string(),
        ))
        .one(&self.conn)
        .await?;
        Ok(row.and_then(|r| r.height).unwrap_or(0))
    }

    /// Replace the active set: every validator is marked inactive, then `records` are upserted
    pub async fn import(&self, records: &[Validator]) -> Result<u64, DbError> {
        bulk::exec(&self.conn, "UPDATE validators SET active = FALSE", vec![]).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let rows: Vec<Row> = records
            .iter()
            .map(|v| {
                vec![
                    v.node_id.clone().into(),
                    v.stake_amount.into(),
                    v.stake_percent.into(),
                    v.potential_reward.into(),
                    v.reward_address.clone().into(),
                    v.active.into(),
                    v.active_start_time.into(),
                    v.active_end_time.into(),
                    v.active_progress_percent.into(),
                    v.uptime.into(),
                    v.delegations_count.into(),
                    v.delegations_percent.into(),
                    v.delegated_amount.into(),
                    v.delegated_amount_percent.into(),
                    v.delegation_fee.into(),
                    v.capacity.into(),
                    v.capacity_percent.into(),
                    v.first_height.into(),
                    v.last_height.into(),
                    now.into(),
                    now.into(),
                ]
            })
            .collect();

        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO validators (
                   node_id, stake_amount, stake_percent, potential_reward, reward_address,
                   active, active_start_time, active_end_time, active_progress_percent, uptime,
                   delegations_count, delegations_percent, delegated_amount,
                   delegated_amount_percent, delegation_fee, capacity, capacity_percent,
                   first_height, last_height, created_at, updated_at)
               VALUES @values
               ON CONFLICT (node_id) DO UPDATE SET
                   stake_amount = EXCLUDED.stake_amount,
                   stake_percent = EXCLUDED.stake_percent,
                   potential_reward = EXCLUDED.potential_reward,
                   reward_address = EXCLUDED.reward_address,
                   active = EXCLUDED.active,
                   active_start_time = EXCLUDED.active_start_time,
                   active_end_time = EXCLUDED.active_end_time,
                   active_progress_percent = EXCLUDED.active_progress_percent,
                   uptime = EXCLUDED.uptime,
                   delegations_count = EXCLUDED.delegations_count,
                   delegations_percent = EXCLUDED.delegations_percent,
                   delegated_amount = EXCLUDED.delegated_amount,
                   delegated_amount_percent = EXCLUDED.delegated_amount_percent,
                   delegation_fee = EXCLUDED.delegation_fee,
                   capacity = EXCLUDED.capacity,
                   capacity_percent = EXCLUDED.capacity_percent,
                   last_height = EXCLUDED.last_height,
                   updated_at = EXCLUDED.updated_at"#,
            rows,
            VALIDATOR_CHUNK,
        )
        .await
    }

    pub async fn import_sequences(&self, records: &[ValidatorSeq]) -> Result<u64, DbError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = records
            .iter()
            .map(|s| {
                vec![
                    s.time.into(),
                    s.height.into(),
                    s.node_id.clone().into(),
                    s.stake_amount.into(),
                    s.stake_percent.into(),
                    s.potential_reward.into(),
                    s.reward_address.clone().into(),
                    s.active.into(),
                    s.active_start_time.into(),
                    s.active_end_time.into(),
                    s.active_progress_percent.into(),
                    s.delegations_count.into(),
                    s.delegations_percent.into(),
                    s.delegated_amount.into(),
                    s.delegated_amount_percent.into(),
                    s.delegation_fee.into(),
                    s.uptime.into(),
                ]
            })
            .collect();

        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO validator_sequences (
                   "time", height, node_id, stake_amount, stake_percent, potential_reward,
                   reward_address, active, active_start_time, active_end_time,
                   active_progress_percent, delegations_count, delegations_percent,
                   delegated_amount, delegated_amount_percent, delegation_fee, uptime)
               VALUES @values"#,
            rows,
            VALIDATOR_CHUNK,
        )
        .await
    }

    /// Delete samples taken before `before`
    pub async fn purge_sequences(&self, before: DateTime<Utc>) -> Result<u64, DbError> {
        bulk::exec(
            &self.conn,
            r#"DELETE FROM validator_sequences WHERE "time" < $1"#,
            vec![before.into()],
        )
        .await
    }

    /// Aggregate the samples of the bucket containing `time` into `validator_stats`
    pub async fn create_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<u64, DbError> {
        let (start, end) = bucket.range(time);
        bulk::exec(
            &self.conn,
            r#"INSERT INTO validator_stats (
                   "time", bucket, node_id, uptime_min, uptime_max, uptime_avg, stake_amount,
                   stake_percent, delegations_count, delegations_percent, delegated_amount,
                   delegated_amount_percent)
               SELECT $1, $2, node_id, MIN(uptime), MAX(uptime), AVG(uptime),
                   MAX(stake_amount), MAX(stake_percent), MAX(delegations_count),
                   MAX(delegations_percent), MAX(delegated_amount),
                   MAX(delegated_amount_percent)
               FROM validator_sequences
               WHERE "time" BETWEEN $1 AND $3
               GROUP BY node_id
               ON CONFLICT ("time", bucket, node_id) DO UPDATE SET
                   uptime_min = EXCLUDED.uptime_min,
                   uptime_max = EXCLUDED.uptime_max,
                   uptime_avg = EXCLUDED.uptime_avg,
                   stake_amount = EXCLUDED.stake_amount,
                   stake_percent = EXCLUDED.stake_percent,
                   delegations_count = EXCLUDED.delegations_count,
                   delegations_percent = EXCLUDED.delegations_percent,
                   delegated_amount = EXCLUDED.delegated_amount,
                   delegated_amount_percent = EXCLUDED.delegated_amount_percent"#,
            vec![start.into(), bucket.as_str().into(), end.into()],
        )
        .await
    }
}
