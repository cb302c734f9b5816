use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Statement,
};
use serde_json::json;

use crate::db::DbError;
use crate::entity::prelude::{TransactionOutputs, Transactions};
use crate::entity::{transaction_outputs, transactions};
use crate::models::{TransactionData, TxSearch, TypeCount};

#[derive(Debug, FromQueryResult)]
struct TypeCountRow {
    tx_type: String,
    total_count: i64,
}

/// Repository for transactions and their outputs
#[derive(Clone)]
pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Transaction with its inputs and outputs ordered by index
    pub async fn find_by_id(&self, id: &str) -> Result<TransactionData, DbError> {
        let transaction = Transactions::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)?;

        let inputs = TransactionOutputs::find()
            .filter(transaction_outputs::Column::SpentTxId.eq(id))
            .order_by_asc(transaction_outputs::Column::Index)
            .all(&self.conn)
            .await?;
        let outputs = TransactionOutputs::find()
            .filter(transaction_outputs::Column::TxId.eq(id))
            .order_by_asc(transaction_outputs::Column::Index)
            .all(&self.conn)
            .await?;

        Ok(TransactionData {
            transaction,
            inputs,
            outputs,
        })
    }

    /// Newest matching transactions first, each with its inputs and outputs
    pub async fn search(&self, search: &TxSearch) -> Result<Vec<TransactionData>, DbError> {
        let mut query = Transactions::find();

        if let Some(start) = search.start_time {
            query = query.filter(transactions::Column::Timestamp.gte(start));
        }
        if let Some(end) = search.end_time {
            query = query.filter(transactions::Column::Timestamp.lte(end));
        }
        if let Some(start) = search.start_height {
            query = query.filter(transactions::Column::BlockHeight.gte(start));
        }
        if let Some(end) = search.end_height {
            query = query.filter(transactions::Column::BlockHeight.lte(end));
        }
        if let Some(chain) = &search.chain {
            query = query.filter(transactions::Column::Chain.eq(chain.as_str()));
        }
        if !search.types.is_empty() {
            query = query.filter(transactions::Column::TxType.is_in(search.types.iter().cloned()));
        }
        for word in &search.memo_words {
            query = query.filter(Expr::cust_with_values(
                "transactions.memo_tsv @@ to_tsquery('english', $1::text)",
                [word.clone()],
            ));
        }
        if let Some(block) = &search.block_hash {
            query = query.filter(transactions::Column::Block.eq(block.as_str()));
        }

        if search.asset.is_some() || !search.addresses.is_empty() {
            let mut outputs = Query::select();
            outputs
                .column(transaction_outputs::Column::TxId)
                .from(TransactionOutputs);
            if let Some(asset) = &search.asset {
                outputs.and_where(transaction_outputs::Column::Asset.eq(asset.as_str()));
            }
            if !search.addresses.is_empty() {
                let any_address = search.addresses.iter().fold(Condition::any(), |cond, addr| {
                    cond.add(Expr::cust_with_values(
                        "transaction_outputs.addresses @> $1::jsonb",
                        [json!([addr]).to_string()],
                    ))
                });
                outputs.cond_where(any_address);
            }
            query = query.filter(transactions::Column::Id.in_subquery(outputs.to_owned()));
        }

        let found = query
            .order_by_desc(transactions::Column::Timestamp)
            .limit(search.limit)
            .offset(search.offset)
            .all(&self.conn)
            .await?;
        if found.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = found.iter().map(|tx| tx.id.clone()).collect();
        let inputs = TransactionOutputs::find()
            .filter(transaction_outputs::Column::SpentTxId.is_in(ids.clone()))
            .order_by_asc(transaction_outputs::Column::Index)
            .all(&self.conn)
            .await?;
        let outputs = TransactionOutputs::find()
            .filter(transaction_outputs::Column::TxId.is_in(ids))
            .order_by_asc(transaction_outputs::Column::Index)
            .all(&self.conn)
            .await?;

        Ok(found
            .into_iter()
            .map(|transaction| {
                let id = transaction.id.as_str();
                let tx_inputs = inputs
                    .iter()
                    .filter(|o| o.spent_tx_id.as_deref() == Some(id))
                    .cloned()
                    .collect();
                let tx_outputs = outputs.iter().filter(|o| o.tx_id == id).cloned().collect();
                TransactionData {
                    transaction,
                    inputs: tx_inputs,
                    outputs: tx_outputs,
                }
            })
            .collect())
    }

    /// Transaction counts per type, most frequent first
    pub async fn type_counts(&self, chain: Option<&str>) -> Result<Vec<TypeCount>, DbError> {
        let statement = match chain {
            Some(chain) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"SELECT "type" AS tx_type, COUNT(1) AS total_count FROM transactions
                   WHERE chain = $1 GROUP BY "type" ORDER BY total_count DESC"#,
                [chain.into()],
            ),
            None => Statement::from_string(
                DbBackend::Postgres,
                r#"SELECT "type" AS tx_type, COUNT(1) AS total_count FROM transactions
                   GROUP BY "type" ORDER BY total_count DESC"#.to_string(),
            ),
        };

        let rows = TypeCountRow::find_by_statement(statement)
            .all(&self.conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| TypeCount {
                tx_type: r.tx_type,
                total_count: r.total_count,
            })
            .collect())
    }

    pub async fn find_output(&self, id: &str) -> Result<transaction_outputs::Model, DbError> {
        TransactionOutputs::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)
    }
}
