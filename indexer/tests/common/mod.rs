//! In-memory node and store used by the integration tests
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use avalanche_indexer::application::sync::{ContainerDecoder, DecodedContainer};
use avalanche_indexer::domain::errors::DecodeError;
use avalanche_indexer::domain::models::{
    Asset, Block, Chain, Event, EventType, Output, RewardsOwner, SyncStatus, Transaction, TxType,
};
use avalanche_indexer::domain::ports::{
    ContainerSource, EventStore, RawContainer, SyncStatusStore, Tip, TxStore,
};
use avalanche_indexer::infrastructure::codec::{Id, ShortId};
use avalanche_indexer::infrastructure::node::NodeClientError;
use avalanche_indexer::infrastructure::persistence::DbError;

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

pub fn container(index: u64) -> RawContainer {
    RawContainer {
        index,
        id: format!("c{}", index),
        bytes: Vec::new(),
        timestamp: at(1_600_000_000 + index as i64),
    }
}

/// Index API over a fixed list of containers. Ranges come back in reverse order.
pub struct MemorySource {
    containers: Vec<RawContainer>,
    pub range_calls: AtomicUsize,
    pub tip_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(containers: Vec<RawContainer>) -> Self {
        Self {
            containers,
            range_calls: AtomicUsize::new(0),
            tip_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerSource for MemorySource {
    async fn last_accepted(&self) -> Result<Tip, NodeClientError> {
        self.tip_calls.fetch_add(1, Ordering::SeqCst);
        let last = self
            .containers
            .iter()
            .max_by_key(|c| c.index)
            .ok_or_else(|| NodeClientError::NotFound("no containers".to_string()))?;
        Ok(Tip {
            index: last.index,
            time: last.timestamp,
        })
    }

    async fn container_range(
        &self,
        start: u64,
        count: u64,
    ) -> Result<Vec<RawContainer>, NodeClientError> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        let mut range: Vec<RawContainer> = self
            .containers
            .iter()
            .filter(|c| c.index >= start && c.index < start + count)
            .cloned()
            .collect();
        range.sort_by_key(|c| std::cmp::Reverse(c.index));
        Ok(range)
    }
}

/// One record-less transaction per container; bytes `bad` fail to decode
pub struct StubDecoder;

impl ContainerDecoder for StubDecoder {
    fn chain(&self) -> &str {
        "x"
    }

    fn decode(&self, container: &RawContainer) -> Result<DecodedContainer, DecodeError> {
        if container.bytes == b"bad" {
            return Err(DecodeError::Malformed("bad container".to_string()));
        }
        let mut tx = Transaction::new(container.id.clone(), TxType::XBase);
        tx.chain = "x".to_string();
        tx.timestamp = container.timestamp;
        Ok(DecodedContainer {
            transactions: vec![tx],
            ..Default::default()
        })
    }
}

#[derive(Default)]
pub struct State {
    pub statuses: HashMap<String, SyncStatus>,
    pub blocks: BTreeMap<String, Block>,
    /// Transaction ids in the order they were first written
    pub tx_order: Vec<String>,
    pub transactions: HashMap<String, Transaction>,
    pub outputs: BTreeMap<String, Output>,
    pub inputs: BTreeSet<(String, String)>,
    pub assets: BTreeMap<String, Asset>,
    pub chains: BTreeMap<String, Chain>,
    pub rewards_owners: BTreeMap<String, RewardsOwner>,
    pub events: BTreeMap<String, Event>,
}

/// Conflict-ignoring store mirroring the SQL repositories
#[derive(Default)]
pub struct MemoryStore {
    pub state: Mutex<State>,
}

impl MemoryStore {
    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn status(&self, id: &str) -> Option<SyncStatus> {
        self.with(|s| s.statuses.get(id).cloned())
    }

    pub fn seed_status(&self, status: SyncStatus) {
        self.with(|s| s.statuses.insert(status.id.clone(), status));
    }

    pub fn add_block(&self, block: Block) {
        self.with(|s| s.blocks.insert(block.id.clone(), block));
    }

    pub fn add_transaction(&self, tx: Transaction) {
        self.with(|s| {
            s.tx_order.push(tx.id.clone());
            s.transactions.insert(tx.id.clone(), tx);
        });
    }

    pub fn events(&self) -> Vec<Event> {
        self.with(|s| {
            let mut events: Vec<Event> = s.events.values().cloned().collect();
            events.sort_by(|a, b| {
                (a.block_height, a.event_type.as_str()).cmp(&(b.block_height, b.event_type.as_str()))
            });
            events
        })
    }
}

#[async_trait]
impl SyncStatusStore for MemoryStore {
    async fn get_sync_status(&self, id: &str) -> Result<SyncStatus, DbError> {
        self.status(id).ok_or(DbError::NotFound)
    }

    async fn update_sync_status(&self, status: &SyncStatus) -> Result<(), DbError> {
        self.seed_status(status.clone());
        Ok(())
    }
}

#[async_trait]
impl TxStore for MemoryStore {
    async fn create_block(&self, block: &Block) -> Result<(), DbError> {
        self.with(|s| {
            s.blocks.entry(block.id.clone()).or_insert_with(|| block.clone());
        });
        Ok(())
    }

    async fn create_transaction(&self, tx: &Transaction) -> Result<(), DbError> {
        self.with(|s| {
            if !s.transactions.contains_key(&tx.id) {
                s.tx_order.push(tx.id.clone());
                s.transactions.insert(tx.id.clone(), tx.clone());
            }
        });
        Ok(())
    }

    async fn create_outputs(&self, outputs: &[Output]) -> Result<(), DbError> {
        self.with(|s| {
            for output in outputs {
                s.outputs.entry(output.id.clone()).or_insert_with(|| output.clone());
            }
        });
        Ok(())
    }

    async fn create_inputs(&self, spent_ids: &[String], tx_id: &str) -> Result<(), DbError> {
        self.with(|s| {
            for id in spent_ids {
                s.inputs.insert((id.clone(), tx_id.to_string()));
            }
        });
        Ok(())
    }

    async fn mark_outputs_spent(
        &self,
        spent_ids: &[String],
        tx_id: &str,
        _spent_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.with(|s| {
            for id in spent_ids {
                if let Some(output) = s.outputs.get_mut(id) {
                    output.spent = true;
                    output.spent_tx_id = Some(tx_id.to_string());
                }
            }
        });
        Ok(())
    }

    async fn create_asset(&self, asset: &Asset) -> Result<(), DbError> {
        self.with(|s| {
            s.assets.entry(asset.asset_id.clone()).or_insert_with(|| asset.clone());
        });
        Ok(())
    }

    async fn create_chain(&self, chain: &Chain) -> Result<(), DbError> {
        self.with(|s| {
            s.chains.entry(chain.chain_id.clone()).or_insert_with(|| chain.clone());
        });
        Ok(())
    }

    async fn create_rewards_owner(&self, owner: &RewardsOwner) -> Result<(), DbError> {
        self.with(|s| {
            s.rewards_owners.entry(owner.id.clone()).or_insert_with(|| owner.clone());
        });
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn last_block(&self, chain: &str) -> Result<Option<Block>, DbError> {
        Ok(self.with(|s| {
            s.blocks
                .values()
                .filter(|b| b.chain == chain)
                .max_by_key(|b| b.height)
                .cloned()
        }))
    }

    async fn blocks_from(
        &self,
        chain: &str,
        start_height: u64,
        limit: u64,
    ) -> Result<Vec<Block>, DbError> {
        Ok(self.with(|s| {
            let mut blocks: Vec<Block> = s
                .blocks
                .values()
                .filter(|b| b.chain == chain && b.height >= start_height)
                .cloned()
                .collect();
            blocks.sort_by_key(|b| b.height);
            blocks.truncate(limit as usize);
            blocks
        }))
    }

    async fn transactions_in_block(&self, block_id: &str) -> Result<Vec<Transaction>, DbError> {
        Ok(self.with(|s| {
            s.tx_order
                .iter()
                .filter_map(|id| s.transactions.get(id))
                .filter(|tx| tx.block.as_deref() == Some(block_id))
                .cloned()
                .collect()
        }))
    }

    async fn find_transaction(&self, id: &str) -> Result<Transaction, DbError> {
        self.with(|s| s.transactions.get(id).cloned())
            .ok_or(DbError::NotFound)
    }

    async fn last_event(
        &self,
        event_type: EventType,
        item_id: &str,
        max_height: u64,
        exclude_tx: &str,
    ) -> Result<Option<Event>, DbError> {
        Ok(self.with(|s| {
            s.events
                .values()
                .filter(|e| {
                    e.event_type == event_type
                        && e.item_id == item_id
                        && e.block_height <= max_height
                        && e.tx_hash != exclude_tx
                })
                .max_by_key(|e| e.block_height)
                .cloned()
        }))
    }

    async fn create_events(&self, events: &[Event]) -> Result<(), DbError> {
        self.with(|s| {
            for event in events {
                s.events.entry(event.id.clone()).or_insert_with(|| event.clone());
            }
        });
        Ok(())
    }
}

/// Big-endian builder for hand-made exchange chain transactions
#[derive(Default)]
pub struct TxBytes(pub Vec<u8>);

impl TxBytes {
    pub fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn id(mut self, id: &Id) -> Self {
        self.0.extend_from_slice(&id.0);
        self
    }

    /// Codec version 0, base tx on `chain` with one secp output and one secp input
    pub fn base_tx(
        chain: &Id,
        asset: &Id,
        out_amount: u64,
        owner: &ShortId,
        spends: (&Id, u32, u64),
    ) -> Vec<u8> {
        let (utxo_tx, utxo_index, in_amount) = spends;
        let mut b = TxBytes(0u16.to_be_bytes().to_vec())
            .u32(0)
            .u32(1)
            .id(chain)
            // outputs
            .u32(1)
            .id(asset)
            .u32(7)
            .u64(out_amount)
            .u64(0)
            .u32(1)
            .u32(1);
        b.0.extend_from_slice(&owner.0);
        b.u32(1)
            .id(utxo_tx)
            .u32(utxo_index)
            .id(asset)
            .u32(5)
            .u64(in_amount)
            .u32(1)
            .u32(0)
            // empty memo, no credentials
            .u32(0)
            .u32(0)
            .0
    }
}
