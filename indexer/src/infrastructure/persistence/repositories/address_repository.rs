use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::collections::BTreeSet;

use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::error::DbError;

const ADDRESS_CHUNK: usize = 1000;

/// Repository for known reward addresses
#[derive(Clone)]
pub struct AddressRepository {
    conn: DatabaseConnection,
}

impl AddressRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record addresses, touching `updated_at` of the ones already known
    pub async fn import(&self, addresses: &[String]) -> Result<u64, DbError> {
        if addresses.is_empty() {
            return Ok(0);
        }
        let unique: BTreeSet<&String> = addresses.iter().collect();
        let now = Utc::now();
        let rows: Vec<Row> = unique
            .into_iter()
            .map(|a| vec![a.clone().into(), now.into(), now.into()])
            .collect();
        bulk::bulk_import(
            &self.conn,
            "INSERT INTO addresses (value, created_at, updated_at) VALUES @values \
             ON CONFLICT (value) DO UPDATE SET updated_at = EXCLUDED.updated_at",
            rows,
            ADDRESS_CHUNK,
        )
        .await
    }
}
