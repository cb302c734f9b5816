use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};

use crate::db::DbError;
use crate::entity::prelude::{Delegations, ValidatorStats, Validators};
use crate::entity::{delegations, validator_stats, validators};
use crate::models::{DelegationSearchParams, StatsBucket, ValidatorSearchParams};

#[derive(Debug, FromQueryResult)]
struct LastTimeRow {
    last_time: Option<DateTime<Utc>>,
}

/// Repository for validators, delegations and their stats
#[derive(Clone)]
pub struct ValidatorRepository {
    conn: DatabaseConnection,
}

impl ValidatorRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active validators ordered by stake
    pub async fn search(
        &self,
        search: &ValidatorSearchParams,
    ) -> Result<Vec<validators::Model>, DbError> {
        let mut query = Validators::find().filter(validators::Column::Active.eq(true));

        if let Some(address) = &search.reward_address {
            query = query.filter(validators::Column::RewardAddress.eq(address.as_str()));
        }
        if let Some(min) = search.capacity_percent_min.filter(|m| *m > 0) {
            query = query.filter(validators::Column::CapacityPercent.gte(min.saturating_sub(1) as f64));
        }
        if let Some(max) = search.capacity_percent_max.filter(|m| *m > 0) {
            query = query.filter(validators::Column::CapacityPercent.lte(max as f64));
        }

        Ok(query
            .order_by_asc(validators::Column::StakeAmount)
            .all(&self.conn)
            .await?)
    }

    pub async fn find_by_node_id(&self, node_id: &str) -> Result<validators::Model, DbError> {
        Validators::find_by_id(node_id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn delegations(
        &self,
        search: &DelegationSearchParams,
    ) -> Result<Vec<delegations::Model>, DbError> {
        let mut query = Delegations::find().filter(delegations::Column::Active.eq(true));

        if let Some(node_id) = search.node_id.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(delegations::Column::NodeId.eq(node_id));
        }
        if let Some(address) = search.reward_address.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(delegations::Column::RewardAddress.eq(address));
        }

        Ok(query
            .order_by_desc(delegations::Column::ReferenceId)
            .all(&self.conn)
            .await?)
    }

    /// Latest `limit` buckets of one validator, newest first
    pub async fn stats(
        &self,
        node_id: &str,
        bucket: StatsBucket,
        limit: u64,
    ) -> Result<Vec<validator_stats::Model>, DbError> {
        Ok(ValidatorStats::find()
            .filter(validator_stats::Column::NodeId.eq(node_id))
            .filter(validator_stats::Column::Bucket.eq(bucket.as_str()))
            .order_by_desc(validator_stats::Column::Time)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    /// Time of the most recent validator sample
    pub async fn last_sample_time(&self) -> Result<Option<DateTime<Utc>>, DbError> {
        let row = LastTimeRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            r#"SELECT MAX("time") AS last_time FROM validator_sequences"#.to_string(),
        ))
        .one(&self.conn)
        .await?;
        Ok(row.and_then(|r| r.last_time))
    }
}
