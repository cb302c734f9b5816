use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Value,
};
use serde_json::{json, Map};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::models::{Asset, Block, Chain, Output, RewardsOwner, Transaction};
use crate::domain::ports::TxStore;
use crate::infrastructure::persistence::bulk::{self, Row};
use crate::infrastructure::persistence::entities::{blocks, transactions};
use crate::infrastructure::persistence::error::DbError;

/// Rows per statement when inserting outputs
const OUTPUT_CHUNK: usize = 100;
/// Rows per statement for the small link tables
const LINK_CHUNK: usize = 500;

/// Repository for blocks, transactions, UTXOs and the side entities created by them
#[derive(Clone)]
pub struct PlatformRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for PlatformRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformRepository").finish_non_exhaustive()
    }
}

fn amounts_json(amounts: &BTreeMap<String, u64>) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = amounts
        .iter()
        .map(|(asset, amount)| (asset.clone(), json!(amount.to_string())))
        .collect();
    serde_json::Value::Object(map)
}

fn amounts_from_json(value: &serde_json::Value) -> BTreeMap<String, u64> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(asset, v)| {
                    let amount = match v {
                        serde_json::Value::String(s) => s.parse().ok(),
                        other => other.as_u64(),
                    };
                    amount.map(|a| (asset.clone(), a))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Amounts are u64 on the wire and kept exactly in `numeric(20, 0)` columns
fn amount_value(amount: u64) -> Value {
    Decimal::from(amount).into()
}

fn amount_from_column(value: Decimal) -> Result<u64, DbError> {
    value
        .to_u64()
        .ok_or_else(|| DbError::Other(format!("amount out of range: {}", value)))
}

fn parse_column<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, DbError> {
    value.parse().map_err(DbError::Other)
}

pub(crate) fn block_from_model(model: blocks::Model) -> Result<Block, DbError> {
    Ok(Block {
        block_type: parse_column(&model.block_type)?,
        id: model.id,
        parent: model.parent,
        chain: model.chain,
        height: model.height.max(0) as u64,
        timestamp: model.timestamp,
    })
}

/// Stored transaction without its inputs and outputs
pub(crate) fn transaction_from_model(model: transactions::Model) -> Result<Transaction, DbError> {
    let mut tx = Transaction::new(model.id, parse_column(&model.tx_type)?);
    tx.reference_tx_id = model.reference_tx_id;
    tx.chain = model.chain;
    tx.block = model.block;
    tx.block_height = model.block_height.map(|h| h.max(0) as u64);
    tx.timestamp = model.timestamp;
    tx.status = parse_column(&model.status)?;
    tx.memo = model.memo;
    tx.memo_text = model.memo_text;
    tx.nonce = model.nonce.map(|n| n.max(0) as u64);
    tx.fee = amount_from_column(model.fee)?;
    tx.source_chain = model.source_chain;
    tx.destination_chain = model.destination_chain;
    tx.metadata = model.metadata.as_object().cloned().unwrap_or_default();
    tx.input_amounts = amounts_from_json(&model.input_amounts);
    tx.output_amounts = amounts_from_json(&model.output_amounts);
    Ok(tx)
}

fn output_row(output: &Output) -> Row {
    vec![
        output.id.clone().into(),
        output.tx_id.clone().into(),
        output.chain.clone().into(),
        output.output_type.map(|t| t.as_str().to_string()).into(),
        output.asset.clone().into(),
        (output.index as i64).into(),
        (output.locktime as i64).into(),
        (output.threshold as i32).into(),
        amount_value(output.amount),
        (output.group as i32).into(),
        json!(output.addresses).into(),
        output.stake.into(),
        output.reward.into(),
        output.payload.clone().into(),
    ]
}

impl PlatformRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Newest block of `chain`
    pub async fn last_block(&self, chain: &str) -> Result<Option<Block>, DbError> {
        blocks::Entity::find()
            .filter(blocks::Column::Chain.eq(chain))
            .order_by_desc(blocks::Column::Height)
            .one(&self.conn)
            .await?
            .map(block_from_model)
            .transpose()
    }

    pub async fn blocks_from(
        &self,
        chain: &str,
        start_height: u64,
        limit: u64,
    ) -> Result<Vec<Block>, DbError> {
        blocks::Entity::find()
            .filter(blocks::Column::Chain.eq(chain))
            .filter(blocks::Column::Height.gte(start_height as i64))
            .order_by_asc(blocks::Column::Height)
            .limit(limit)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(block_from_model)
            .collect()
    }

    pub async fn transactions_in_block(&self, block_id: &str) -> Result<Vec<Transaction>, DbError> {
        transactions::Entity::find()
            .filter(transactions::Column::Block.eq(block_id))
            .order_by_asc(transactions::Column::Timestamp)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(transaction_from_model)
            .collect()
    }

    pub async fn find_transaction(&self, id: &str) -> Result<Transaction, DbError> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(DbError::NotFound)?;
        transaction_from_model(model)
    }

    pub async fn insert_block(&self, block: &Block) -> Result<(), DbError> {
        bulk::exec(
            &self.conn,
            r#"INSERT INTO blocks (id, parent, chain, "type", height, "timestamp")
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (id) DO NOTHING"#,
            vec![
                block.id.clone().into(),
                block.parent.clone().into(),
                block.chain.clone().into(),
                block.block_type.as_str().into(),
                (block.height as i64).into(),
                block.timestamp.into(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Insert or overwrite a transaction row. The row is fully determined by the id.
    pub async fn insert_transaction(&self, tx: &Transaction) -> Result<(), DbError> {
        let values: Vec<Value> = vec![
            tx.id.clone().into(),
            tx.reference_tx_id.clone().into(),
            tx.chain.clone().into(),
            tx.tx_type.as_str().into(),
            tx.block.clone().into(),
            tx.block_height.map(|h| h as i64).into(),
            tx.timestamp.into(),
            tx.status.as_str().into(),
            tx.memo.clone().into(),
            tx.memo_text.clone().into(),
            tx.nonce.map(|n| n as i64).into(),
            amount_value(tx.fee),
            tx.source_chain.clone().into(),
            tx.destination_chain.clone().into(),
            serde_json::Value::Object(tx.metadata.clone()).into(),
            amounts_json(&tx.input_amounts).into(),
            amounts_json(&tx.output_amounts).into(),
        ];

        bulk::exec(
            &self.conn,
            r#"INSERT INTO transactions (
                   id, reference_tx_id, chain, "type", block, block_height, "timestamp",
                   status, memo, memo_text, nonce, fee, source_chain, destination_chain,
                   metadata, input_amounts, output_amounts)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
               ON CONFLICT (id) DO UPDATE SET
                   reference_tx_id = EXCLUDED.reference_tx_id,
                   block = EXCLUDED.block,
                   block_height = EXCLUDED.block_height,
                   "timestamp" = EXCLUDED."timestamp",
                   status = EXCLUDED.status,
                   fee = EXCLUDED.fee,
                   metadata = EXCLUDED.metadata,
                   input_amounts = EXCLUDED.input_amounts,
                   output_amounts = EXCLUDED.output_amounts"#,
            values,
        )
        .await?;
        Ok(())
    }

    /// Insert outputs in chunks. Spend markers of existing rows are left alone.
    pub async fn insert_outputs(&self, outputs: &[Output]) -> Result<u64, DbError> {
        if outputs.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = outputs.iter().map(output_row).collect();
        bulk::bulk_import(
            &self.conn,
            r#"INSERT INTO transaction_outputs (
                   id, tx_id, chain, "type", asset, "index", locktime, threshold, amount,
                   "group", addresses, stake, reward, payload)
               VALUES @values
               ON CONFLICT (id) DO NOTHING"#,
            rows,
            OUTPUT_CHUNK,
        )
        .await
    }

    pub async fn insert_inputs(&self, spent_ids: &[String], tx_id: &str) -> Result<u64, DbError> {
        if spent_ids.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = spent_ids
            .iter()
            .map(|id| vec![id.clone().into(), tx_id.into()])
            .collect();
        bulk::bulk_import(
            &self.conn,
            "INSERT INTO transaction_inputs (id, tx_id) VALUES @values ON CONFLICT (id) DO NOTHING",
            rows,
            LINK_CHUNK,
        )
        .await
    }

    /// Flag outputs as consumed by `tx_id`. Outputs not yet stored are skipped.
    pub async fn mark_spent(
        &self,
        spent_ids: &[String],
        tx_id: &str,
        spent_at: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        if spent_ids.is_empty() {
            return Ok(0);
        }
        let mut affected = 0;
        for chunk in spent_ids.chunks(LINK_CHUNK) {
            let ids: Vec<String> = (0..chunk.len()).map(|i| format!("${}", i + 3)).collect();
            let sql = format!(
                "UPDATE transaction_outputs SET spent = TRUE, spent_tx_id = $1, spent_at = $2 \
                 WHERE id IN ({})",
                ids.join(", ")
            );
            let mut values: Vec<Value> = vec![tx_id.into(), spent_at.into()];
            values.extend(chunk.iter().map(|id| Value::from(id.clone())));
            affected += bulk::exec(&self.conn, &sql, values).await?;
        }
        Ok(affected)
    }

    pub async fn insert_asset(&self, asset: &Asset) -> Result<(), DbError> {
        bulk::exec(
            &self.conn,
            r#"INSERT INTO assets (asset_id, "type", name, symbol, denomination)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (asset_id) DO NOTHING"#,
            vec![
                asset.asset_id.clone().into(),
                asset.asset_type.as_str().into(),
                asset.name.clone().into(),
                asset.symbol.clone().into(),
                (asset.denomination as i16).into(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn insert_chain(&self, chain: &Chain) -> Result<(), DbError> {
        bulk::exec(
            &self.conn,
            "INSERT INTO chains (chain_id, name, vm, network, subnet) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (chain_id) DO NOTHING",
            vec![
                chain.chain_id.clone().into(),
                chain.name.clone().into(),
                chain.vm.clone().into(),
                (chain.network as i32).into(),
                chain.subnet.clone().into(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Owner row plus its addresses and reward outputs
    pub async fn insert_rewards_owner(&self, owner: &RewardsOwner) -> Result<(), DbError> {
        bulk::exec(
            &self.conn,
            "INSERT INTO rewards_owners (id, locktime, threshold) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
            vec![
                owner.id.clone().into(),
                (owner.locktime as i64).into(),
                (owner.threshold as i32).into(),
            ],
        )
        .await?;

        if !owner.addresses.is_empty() {
            let rows: Vec<Row> = owner
                .addresses
                .iter()
                .map(|a| {
                    vec![
                        a.id.clone().into(),
                        a.address.clone().into(),
                        (a.index as i32).into(),
                    ]
                })
                .collect();
            bulk::bulk_import(
                &self.conn,
                r#"INSERT INTO rewards_owner_addresses (id, address, "index") VALUES @values
                   ON CONFLICT (id, address) DO NOTHING"#,
                rows,
                LINK_CHUNK,
            )
            .await?;
        }

        if !owner.outputs.is_empty() {
            let rows: Vec<Row> = owner
                .outputs
                .iter()
                .map(|o| {
                    vec![
                        o.id.clone().into(),
                        o.transaction_id.clone().into(),
                        (o.index as i32).into(),
                    ]
                })
                .collect();
            bulk::bulk_import(
                &self.conn,
                r#"INSERT INTO rewards_owner_outputs (id, transaction_id, "index") VALUES @values
                   ON CONFLICT (id) DO NOTHING"#,
                rows,
                LINK_CHUNK,
            )
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl TxStore for PlatformRepository {
    async fn create_block(&self, block: &Block) -> Result<(), DbError> {
        self.insert_block(block).await
    }

    async fn create_transaction(&self, tx: &Transaction) -> Result<(), DbError> {
        self.insert_transaction(tx).await
    }

    async fn create_outputs(&self, outputs: &[Output]) -> Result<(), DbError> {
        self.insert_outputs(outputs).await.map(|_| ())
    }

    async fn create_inputs(&self, spent_ids: &[String], tx_id: &str) -> Result<(), DbError> {
        self.insert_inputs(spent_ids, tx_id).await.map(|_| ())
    }

    async fn mark_outputs_spent(
        &self,
        spent_ids: &[String],
        tx_id: &str,
        spent_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.mark_spent(spent_ids, tx_id, spent_at).await.map(|_| ())
    }

    async fn create_asset(&self, asset: &Asset) -> Result<(), DbError> {
        self.insert_asset(asset).await
    }

    async fn create_chain(&self, chain: &Chain) -> Result<(), DbError> {
        self.insert_chain(chain).await
    }

    async fn create_rewards_owner(&self, owner: &RewardsOwner) -> Result<(), DbError> {
        self.insert_rewards_owner(owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_stored_as_decimal_strings() {
        let mut amounts = BTreeMap::new();
        amounts.insert("asset".to_string(), u64::MAX);
        let stored = amounts_json(&amounts);
        assert_eq!(stored["asset"], json!(u64::MAX.to_string()));
        assert_eq!(amounts_from_json(&stored), amounts);
    }

    #[test]
    fn stored_models_map_back_to_domain() {
        let model = transactions::Model {
            id: "tx".to_string(),
            reference_tx_id: None,
            chain: "P".to_string(),
            tx_type: "p_add_validator".to_string(),
            block: Some("b".to_string()),
            block_height: Some(12),
            timestamp: Utc::now(),
            status: "accepted".to_string(),
            memo: None,
            memo_text: None,
            nonce: None,
            fee: Decimal::ZERO,
            source_chain: None,
            destination_chain: None,
            metadata: json!({ "node_id": "NodeID-a" }),
            input_amounts: json!({}),
            output_amounts: json!({}),
        };
        let tx = transaction_from_model(model).unwrap();
        assert_eq!(tx.block_height, Some(12));
        assert_eq!(tx.meta_str("node_id"), Some("NodeID-a"));

        let bad = blocks::Model {
            id: "b".to_string(),
            parent: "a".to_string(),
            chain: "P".to_string(),
            block_type: "sideways".to_string(),
            height: 1,
            timestamp: Utc::now(),
        };
        assert!(block_from_model(bad).is_err());
    }

    #[test]
    fn amounts_above_i64_are_stored_exactly() {
        let mut output = Output::new("o", "t", "asset");
        output.amount = u64::MAX;
        let row = output_row(&output);
        assert_eq!(row[8], Value::from(Decimal::from(u64::MAX)));

        assert_eq!(amount_from_column(Decimal::from(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(amount_from_column(Decimal::ZERO).unwrap(), 0);
        assert!(amount_from_column(Decimal::from(-1)).is_err());
        assert!(amount_from_column(Decimal::from(u64::MAX) + Decimal::ONE).is_err());
    }
}
