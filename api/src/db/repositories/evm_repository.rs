use sea_orm::{DatabaseConnection, EntityTrait};

use crate::db::DbError;
use crate::entity::prelude::{EvmReceipts, EvmTraces};
use crate::entity::{evm_receipts, evm_traces};

/// Repository for contract chain receipts and call traces
#[derive(Clone)]
pub struct EvmRepository {
    conn: DatabaseConnection,
}

impl EvmRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn receipt(&self, tx_id: &str) -> Result<Option<evm_receipts::Model>, DbError> {
        Ok(EvmReceipts::find_by_id(tx_id.to_string())
            .one(&self.conn)
            .await?)
    }

    pub async fn trace(&self, tx_id: &str) -> Result<Option<evm_traces::Model>, DbError> {
        Ok(EvmTraces::find_by_id(tx_id.to_string())
            .one(&self.conn)
            .await?)
    }
}
