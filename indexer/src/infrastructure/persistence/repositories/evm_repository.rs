use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use serde_json::json;

use crate::domain::models::{EvmReceipt, EvmTrace, TxType};
use crate::domain::ports::{EvmStore, PendingEvmTx};
use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::error::DbError;

const EVM_CHUNK: usize = 100;

/// Repository for EVM receipts and call traces
#[derive(Clone)]
pub struct EvmRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct PendingRow {
    id: String,
    block_height: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct HeightRow {
    height: Option<i64>,
}

impl EvmRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert_receipts(&self, receipts: &[EvmReceipt]) -> Result<u64, DbError> {
        if receipts.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = receipts
            .iter()
            .map(|r| {
                vec![
                    r.id.clone().into(),
                    (r.receipt_type as i16).into(),
                    (r.status as i64).into(),
                    r.contract_address.clone().into(),
                    json!(r.logs).into(),
                ]
            })
            .collect();
        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO evm_receipts (id, "type", status, contract_address, logs)
               VALUES @values
               ON CONFLICT (id) DO UPDATE SET
                   status = EXCLUDED.status,
                   contract_address = EXCLUDED.contract_address,
                   logs = EXCLUDED.logs"#,
            rows,
            EVM_CHUNK,
        )
        .await
    }

    pub async fn insert_traces(&self, traces: &[EvmTrace]) -> Result<u64, DbError> {
        if traces.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = traces
            .iter()
            .map(|t| vec![t.id.clone().into(), t.data.clone().into(), t.created_at.into()])
            .collect();
        bulk::bulk_import(
            &self.conn,
            "INSERT INTO evm_traces (id, data, created_at) VALUES @values \
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data",
            rows,
            EVM_CHUNK,
        )
        .await
    }
}

#[async_trait]
impl EvmStore for EvmRepository {
    async fn last_block_height(&self, chain: &str) -> Result<Option<u64>, DbError> {
        let row = HeightRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT MAX(height) AS height FROM blocks WHERE chain = $1",
            vec![chain.into()],
        ))
        .one(&self.conn)
        .await?;
        Ok(row.and_then(|r| r.height).map(|h| h.max(0) as u64))
    }

    async fn evm_transactions(
        &self,
        chain: &str,
        start_height: u64,
        end_height: u64,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PendingEvmTx>, DbError> {
        let rows = PendingRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"SELECT id, block_height FROM transactions
               WHERE chain = $1 AND "type" = $2 AND block_height BETWEEN $3 AND $4
               ORDER BY block_height ASC, id ASC
               LIMIT $5 OFFSET $6"#,
            vec![
                chain.into(),
                TxType::CEvm.as_str().into(),
                (start_height as i64).into(),
                (end_height as i64).into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        ))
        .all(&self.conn)
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| PendingEvmTx {
                id: r.id,
                block_height: r.block_height.unwrap_or(0).max(0) as u64,
            })
            .collect())
    }

    async fn save_receipts(&self, receipts: &[EvmReceipt]) -> Result<(), DbError> {
        self.insert_receipts(receipts).await.map(|_| ())
    }

    async fn save_traces(&self, traces: &[EvmTrace]) -> Result<(), DbError> {
        self.insert_traces(traces).await.map(|_| ())
    }
}
