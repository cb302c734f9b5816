use std::sync::Arc;

use crate::domain::ports::TxStore;
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

use super::mapper::DecodedContainer;

/// Stores decoded containers. Every statement tolerates conflicts, so a
/// container persisted twice leaves the same rows behind.
///
/// The block row is written last. Readers that take the highest stored block
/// as their tip only see it once all of its transactions are in place.
#[derive(Clone)]
pub struct PersistenceWriter {
    store: Arc<dyn TxStore>,
}

impl PersistenceWriter {
    pub fn new(store: Arc<dyn TxStore>) -> Self {
        Self { store }
    }

    pub async fn persist(&self, decoded: &DecodedContainer) -> Result<(), DbError> {
        for tx in &decoded.transactions {
            self.store.create_transaction(tx).await?;
            if !tx.uses_utxos() {
                continue;
            }

            self.store.create_outputs(&tx.outputs).await?;

            let spent = tx.spent_output_ids();
            if spent.is_empty() {
                continue;
            }
            self.store.create_inputs(&spent, &tx.id).await?;
            self.store
                .mark_outputs_spent(&spent, &tx.id, tx.timestamp)
                .await?;
        }

        for asset in &decoded.assets {
            logging::log_info(&format!(
                "[writer] new asset {} ({})",
                asset.asset_id, asset.symbol
            ));
            self.store.create_asset(asset).await?;
        }
        for chain in &decoded.chains {
            logging::log_info(&format!(
                "[writer] new chain {} ({})",
                chain.chain_id, chain.name
            ));
            self.store.create_chain(chain).await?;
        }
        for owner in &decoded.rewards_owners {
            self.store.create_rewards_owner(owner).await?;
        }

        if let Some(block) = &decoded.block {
            self.store.create_block(block).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        Asset, Block, BlockType, Chain, Output, RewardsOwner, Transaction, TxType,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn push(&self, entry: String) -> Result<(), DbError> {
            if self.fail_on.map_or(false, |f| entry.starts_with(f)) {
                return Err(DbError::QueryError(format!("{} failed", entry)));
            }
            self.log.lock().unwrap().push(entry);
            Ok(())
        }

        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TxStore for Recorder {
        async fn create_block(&self, block: &Block) -> Result<(), DbError> {
            self.push(format!("block {}", block.height))
        }

        async fn create_transaction(&self, tx: &Transaction) -> Result<(), DbError> {
            self.push(format!("tx {}", tx.id))
        }

        async fn create_outputs(&self, outputs: &[Output]) -> Result<(), DbError> {
            self.push(format!("outputs {}", outputs.len()))
        }

        async fn create_inputs(&self, spent_ids: &[String], _tx_id: &str) -> Result<(), DbError> {
            self.push(format!("inputs {}", spent_ids.join(",")))
        }

        async fn mark_outputs_spent(
            &self,
            spent_ids: &[String],
            _tx_id: &str,
            _spent_at: DateTime<Utc>,
        ) -> Result<(), DbError> {
            self.push(format!("spent {}", spent_ids.join(",")))
        }

        async fn create_asset(&self, asset: &Asset) -> Result<(), DbError> {
            self.push(format!("asset {}", asset.asset_id))
        }

        async fn create_chain(&self, chain: &Chain) -> Result<(), DbError> {
            self.push(format!("chain {}", chain.chain_id))
        }

        async fn create_rewards_owner(&self, owner: &RewardsOwner) -> Result<(), DbError> {
            self.push(format!("owner {}", owner.id))
        }
    }

    fn evm_container() -> DecodedContainer {
        let block = Block {
            id: "b2".to_string(),
            parent: "b1".to_string(),
            chain: "c-chain".to_string(),
            block_type: BlockType::Evm,
            height: 2,
            timestamp: Utc::now(),
        };
        DecodedContainer {
            block: Some(block),
            transactions: vec![
                Transaction::new("0x01", TxType::CEvm),
                Transaction::new("0x02", TxType::CEvm),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn block_row_follows_its_transactions() {
        let store = Arc::new(Recorder::default());
        let writer = PersistenceWriter::new(store.clone());

        writer.persist(&evm_container()).await.unwrap();

        assert_eq!(store.entries(), vec!["tx 0x01", "tx 0x02", "block 2"]);
    }

    #[tokio::test]
    async fn failed_transaction_leaves_no_block_row() {
        let store = Arc::new(Recorder {
            fail_on: Some("tx 0x02"),
            ..Default::default()
        });
        let writer = PersistenceWriter::new(store.clone());

        assert!(writer.persist(&evm_container()).await.is_err());
        assert_eq!(store.entries(), vec!["tx 0x01"]);
    }

    #[tokio::test]
    async fn utxo_spends_are_linked_and_marked() {
        let store = Arc::new(Recorder::default());
        let writer = PersistenceWriter::new(store.clone());

        let mut tx = Transaction::new("t2", TxType::XBase);
        tx.inputs = vec![Output::new("o1", "t1", "avax")];
        tx.outputs = vec![Output::new("o2", "t2", "avax")];
        let decoded = DecodedContainer {
            transactions: vec![tx],
            ..Default::default()
        };

        writer.persist(&decoded).await.unwrap();
        assert_eq!(
            store.entries(),
            vec!["tx t2", "outputs 1", "inputs o1", "spent o1"]
        );
    }
}
