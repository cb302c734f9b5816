use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, Statement,
};

use crate::db::DbError;
use crate::entity::assets::{Column, Model};
use crate::entity::prelude::Assets;

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Repository for asset lookups
#[derive(Clone)]
pub struct AssetRepository {
    conn: DatabaseConnection,
}

impl AssetRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All assets, optionally restricted to one asset type
    pub async fn find_all(&self, asset_type: Option<&str>) -> Result<Vec<Model>, DbError> {
        let mut query = Assets::find();
        if let Some(asset_type) = asset_type {
            query = query.filter(Column::AssetType.eq(asset_type));
        }
        Ok(query.order_by_asc(Column::Name).all(&self.conn).await?)
    }

    pub async fn find_by_id(&self, asset_id: &str) -> Result<Model, DbError> {
        Assets::find_by_id(asset_id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Number of distinct transactions with an output of the asset
    pub async fn transactions_count(&self, asset_id: &str) -> Result<i64, DbError> {
        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT COUNT(DISTINCT tx_id) AS total FROM transaction_outputs WHERE asset = $1",
            [asset_id.into()],
        ))
        .one(&self.conn)
        .await?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }
}
