use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::domain::models::{NetworkMetric, StatsBucket};
use crate::infrastructure::persistence::bulk;
use crate::infrastructure::persistence::error::DbError;

/// Repository for network metric samples and their bucketed stats
#[derive(Clone)]
pub struct NetworkRepository {
    conn: DatabaseConnection,
}

impl NetworkRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_metric(&self, metric: &NetworkMetric) -> Result<(), DbError> {
        bulk::exec(
            &self.conn,
            r#"INSERT INTO network_metrics (
                   "time", height, peers_count, blockchains_count, active_validators_count,
                   pending_validators_count, active_delegations_count,
                   pending_delegations_count, min_validator_stake, min_delegation_stake,
                   tx_fee, creation_tx_fee, uptime, delegation_fee, total_staked,
                   total_delegated)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"#,
            vec![
                metric.time.into(),
                metric.height.into(),
                metric.peers_count.into(),
                metric.blockchains_count.into(),
                metric.active_validators_count.into(),
                metric.pending_validators_count.into(),
                metric.active_delegations_count.into(),
                metric.pending_delegations_count.into(),
                metric.min_validator_stake.into(),
                metric.min_delegation_stake.into(),
                metric.tx_fee.into(),
                metric.creation_tx_fee.into(),
                metric.uptime.into(),
                metric.delegation_fee.into(),
                metric.total_staked.into(),
                metric.total_delegated.into(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Aggregate the metrics of the bucket containing `time` into `network_stats`
    pub async fn create_stats(
        &self,
        time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<u64, DbError> {
        let (start, end) = bucket.range(time);
        bulk::exec(
            &self.conn,
            r#"INSERT INTO network_stats (
                   "time", bucket, height_change, peers, blockchains, active_validators,
                   pending_validators, validator_uptime, active_delegations,
                   pending_delegations, min_validator_stake, min_delegation_stake, tx_fee,
                   create_tx_fee, total_staked, total_delegated)
               SELECT $1, $2, MAX(height) - MIN(height), MAX(peers_count),
                   MAX(blockchains_count), MAX(active_validators_count),
                   MAX(pending_validators_count), AVG(uptime), MAX(active_delegations_count),
                   MAX(pending_delegations_count), MAX(min_validator_stake),
                   MAX(min_delegation_stake), MAX(tx_fee), MAX(creation_tx_fee),
                   MAX(total_staked), MAX(total_delegated)
               FROM network_metrics
               WHERE "time" BETWEEN $1 AND $3
               HAVING COUNT(*) > 0
               ON CONFLICT ("time", bucket) DO UPDATE SET
                   height_change = EXCLUDED.height_change,
                   peers = EXCLUDED.peers,
                   blockchains = EXCLUDED.blockchains,
                   active_validators = EXCLUDED.active_validators,
                   pending_validators = EXCLUDED.pending_validators,
                   validator_uptime = EXCLUDED.validator_uptime,
                   active_delegations = EXCLUDED.active_delegations,
                   pending_delegations = EXCLUDED.pending_delegations,
                   min_validator_stake = EXCLUDED.min_validator_stake,
                   min_delegation_stake = EXCLUDED.min_delegation_stake,
                   tx_fee = EXCLUDED.tx_fee,
                   create_tx_fee = EXCLUDED.create_tx_fee,
                   total_staked = EXCLUDED.total_staked,
                   total_delegated = EXCLUDED.total_delegated"#,
            vec![start.into(), bucket.as_str().into(), end.into()],
        )
        .await
    }
}
