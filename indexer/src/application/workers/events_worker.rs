use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::{RunReport, Worker};
use crate::application::sync::SyncCursor;
use crate::domain::errors::SyncError;
use crate::domain::models::{
    Block, BlockType, Event, EventScope, EventType, ItemType, Transaction, TxType,
};
use crate::domain::ports::{EventStore, Tip};
use crate::utils::logging;

const COMMISSION_RATE: &str = "validator_commission_rate";

/// Derives staking and network events from persisted platform blocks.
///
/// A staking transaction lands in a proposal block; the commit or abort
/// block that follows decides it. Each block is therefore matched with the
/// transaction of its parent.
pub struct EventsWorker {
    stream: String,
    chain: String,
    store: Arc<dyn EventStore>,
    cursor: SyncCursor,
    batch_size: u64,
}

impl EventsWorker {
    pub fn new(
        chain: impl Into<String>,
        store: Arc<dyn EventStore>,
        cursor: SyncCursor,
        batch_size: u64,
    ) -> Self {
        let chain = chain.into();
        Self {
            stream: format!("{}_events", chain),
            chain,
            store,
            cursor,
            batch_size: batch_size.max(1),
        }
    }

    async fn process_block(&self, block: &Block) -> Result<(), SyncError> {
        let txs = self.store.transactions_in_block(&block.parent).await?;
        let Some(tx) = txs.first() else {
            return Ok(());
        };

        let events = self.derive_events(block, tx).await?;
        if events.is_empty() {
            return Ok(());
        }
        for event in &events {
            logging::log_debug(&format!(
                "[{}] creating event {} for {}",
                self.stream, event.event_type, event.item_id
            ));
        }
        self.store.create_events(&events).await?;
        Ok(())
    }

    /// Events caused by `tx` as decided by `block`
    pub async fn derive_events(
        &self,
        block: &Block,
        tx: &Transaction,
    ) -> Result<Vec<Event>, SyncError> {
        match tx.tx_type {
            TxType::PAddValidator => self.validator_added(block, tx).await,
            TxType::PAddDelegator => {
                if block.block_type != BlockType::Commit {
                    return Ok(Vec::new());
                }
                let event = new_event(
                    block,
                    tx,
                    EventScope::Staking,
                    EventType::DelegatorAdded,
                    node_id(tx, "node_id")?,
                    tx.metadata.clone(),
                );
                Ok(vec![event])
            }
            TxType::PRewardValidator => self.staking_finished(block, tx).await,
            TxType::PAddSubnetValidator => {
                let event = new_event(
                    block,
                    tx,
                    EventScope::Network,
                    EventType::SubnetValidatorAdded,
                    node_id(tx, "validator_node_id")?,
                    Map::new(),
                );
                Ok(vec![event])
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn validator_added(
        &self,
        block: &Block,
        tx: &Transaction,
    ) -> Result<Vec<Event>, SyncError> {
        if block.block_type != BlockType::Commit {
            return Ok(Vec::new());
        }

        let added = new_event(
            block,
            tx,
            EventScope::Staking,
            EventType::ValidatorAdded,
            node_id(tx, "node_id")?,
            tx.metadata.clone(),
        );

        let previous = self
            .store
            .last_event(
                EventType::ValidatorAdded,
                &added.item_id,
                block.height,
                &tx.id,
            )
            .await?;

        let changed = previous.and_then(|prev| commission_change(block, tx, &prev, &added));
        let mut events = vec![added];
        events.extend(changed);
        Ok(events)
    }

    async fn staking_finished(
        &self,
        block: &Block,
        tx: &Transaction,
    ) -> Result<Vec<Event>, SyncError> {
        let Some(reference) = tx.reference_tx_id.as_deref() else {
            return Ok(Vec::new());
        };

        let staking = match self.store.find_transaction(reference).await {
            Ok(staking) => staking,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let event_type = match staking.tx_type {
            TxType::PAddValidator => EventType::ValidatorFinished,
            TxType::PAddDelegator => EventType::DelegatorFinished,
            other => {
                return Err(SyncError::ProcessingError(format!(
                    "unhandled reward validator reference type: {}",
                    other
                )))
            }
        };

        let mut data = Map::new();
        data.insert(
            "rewarded".to_string(),
            Value::Bool(block.block_type == BlockType::Commit),
        );

        let event = new_event(
            block,
            tx,
            EventScope::Staking,
            event_type,
            node_id(&staking, "node_id")?,
            data,
        );
        Ok(vec![event])
    }
}

fn node_id(tx: &Transaction, key: &str) -> Result<String, SyncError> {
    tx.meta_str(key).map(str::to_string).ok_or_else(|| {
        SyncError::ProcessingError(format!("transaction {} has no {}", tx.id, key))
    })
}

fn new_event(
    block: &Block,
    tx: &Transaction,
    scope: EventScope,
    event_type: EventType,
    item_id: String,
    data: Map<String, Value>,
) -> Event {
    Event {
        id: String::new(),
        chain: block.chain.clone(),
        block_hash: block.id.clone(),
        block_height: block.height,
        tx_hash: tx.id.clone(),
        timestamp: block.timestamp,
        scope,
        event_type,
        item_id,
        item_type: ItemType::Validator,
        data,
    }
    .with_derived_id()
}

/// Commission change between two validator-added events of the same node
fn commission_change(block: &Block, tx: &Transaction, previous: &Event, current: &Event) -> Option<Event> {
    if previous.event_type != current.event_type {
        return None;
    }
    let before = previous.data.get(COMMISSION_RATE).and_then(Value::as_f64)?;
    let after = current.data.get(COMMISSION_RATE).and_then(Value::as_f64)?;
    if before == after {
        return None;
    }

    let mut data = Map::new();
    data.insert("before".to_string(), before.into());
    data.insert("after".to_string(), after.into());
    data.insert("change".to_string(), (after - before).into());

    Some(new_event(
        block,
        tx,
        current.scope,
        EventType::ValidatorCommissionChanged,
        current.item_id.clone(),
        data,
    ))
}

#[async_trait]
impl Worker for EventsWorker {
    fn name(&self) -> &str {
        &self.stream
    }

    async fn run(&mut self, cancel: &CancellationToken) -> Result<RunReport, SyncError> {
        let Some(last) = self.store.last_block(&self.chain).await? else {
            return Ok(RunReport { index: 0, lag: 0 });
        };
        let tip = Tip {
            index: last.height,
            time: last.timestamp,
        };

        let mut status = self.cursor.get_or_init(&self.stream, tip).await?;
        self.cursor.refresh_tip(&mut status, tip).await?;
        if status.at_tip() {
            return Ok(RunReport::from(&status));
        }

        let blocks = self
            .store
            .blocks_from(&self.chain, status.next_id(), self.batch_size)
            .await?;
        if blocks.is_empty() {
            logging::log_debug(&format!(
                "[{}] no new blocks from height {}",
                self.stream,
                status.next_id()
            ));
            return Ok(RunReport::from(&status));
        }

        let mut outcome = Ok(());
        for block in &blocks {
            if cancel.is_cancelled() {
                break;
            }
            if let Err(e) = self.process_block(block).await {
                outcome = Err(e);
                break;
            }
            status.advance(block.height, block.timestamp);
        }

        self.cursor.save(&status).await?;
        outcome.map(|_| RunReport::from(&status))
    }
}
