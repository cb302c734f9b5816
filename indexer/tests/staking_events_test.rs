mod common;

use std::sync::Arc;

use avalanche_indexer::application::sync::SyncCursor;
use avalanche_indexer::application::workers::{EventsWorker, Worker};
use avalanche_indexer::domain::models::{Block, BlockType, EventScope, EventType, Transaction, TxType};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use common::{at, MemoryStore};

const P_CHAIN: &str = "11111111111111111111111111111111LpoYY";
const NODE: &str = "NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg";

fn block(height: u64, block_type: BlockType) -> Block {
    Block {
        id: format!("b{}", height),
        parent: format!("b{}", height.saturating_sub(1)),
        chain: P_CHAIN.to_string(),
        block_type,
        height,
        timestamp: at(1_600_000_000 + height as i64 * 10),
    }
}

fn staking_tx(id: &str, tx_type: TxType, in_block: u64, commission: Option<f64>) -> Transaction {
    let mut tx = Transaction::new(id, tx_type);
    tx.chain = P_CHAIN.to_string();
    tx.block = Some(format!("b{}", in_block));
    tx.block_height = Some(in_block);
    tx.set_meta("node_id", NODE);
    if let Some(rate) = commission {
        tx.set_meta("validator_commission_rate", rate);
    }
    tx
}

/// Two validator registrations of the same node with different commissions,
/// each decided by a commit block, then a reward for the first one
fn store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.add_block(block(1, BlockType::Proposal));
    store.add_block(block(2, BlockType::Commit));
    store.add_block(block(3, BlockType::Proposal));
    store.add_block(block(4, BlockType::Commit));
    store.add_block(block(5, BlockType::Proposal));
    store.add_block(block(6, BlockType::Commit));
    store.add_transaction(staking_tx("tx1", TxType::PAddValidator, 1, Some(2.0)));
    store.add_transaction(staking_tx("tx2", TxType::PAddValidator, 3, Some(3.5)));

    let mut reward = Transaction::new("tx3", TxType::PRewardValidator);
    reward.chain = P_CHAIN.to_string();
    reward.block = Some("b5".to_string());
    reward.reference_tx_id = Some("tx1".to_string());
    store.add_transaction(reward);
    store
}

fn worker(store: &Arc<MemoryStore>) -> EventsWorker {
    EventsWorker::new(P_CHAIN, store.clone(), SyncCursor::new(store.clone()), 100)
}

#[tokio::test]
async fn derives_staking_lifecycle() {
    let store = store();
    let report = worker(&store).run(&CancellationToken::new()).await.unwrap();
    assert_eq!((report.index, report.lag), (6, 0));

    let events = store.events();
    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            EventType::ValidatorAdded,
            EventType::ValidatorAdded,
            EventType::ValidatorCommissionChanged,
            EventType::ValidatorFinished,
        ]
    );
    assert!(events.iter().all(|e| e.item_id == NODE));
    assert!(events.iter().all(|e| e.scope == EventScope::Staking));

    let changed = &events[2];
    assert_eq!(changed.tx_hash, "tx2");
    assert_eq!(changed.block_height, 4);
    assert_eq!(changed.data["before"], Value::from(2.0));
    assert_eq!(changed.data["after"], Value::from(3.5));
    assert_eq!(changed.data["change"], Value::from(1.5));

    let finished = &events[3];
    assert_eq!(finished.tx_hash, "tx3");
    assert_eq!(finished.data["rewarded"], Value::Bool(true));
    assert_eq!(store.status(&format!("{}_events", P_CHAIN)).unwrap().index_id, 6);
}

#[tokio::test]
async fn rederiving_from_scratch_adds_nothing() {
    let store = store();
    worker(&store).run(&CancellationToken::new()).await.unwrap();
    let first = store.events();

    store.with(|s| s.statuses.clear());
    worker(&store).run(&CancellationToken::new()).await.unwrap();
    assert_eq!(store.events(), first);
}

#[tokio::test]
async fn aborted_registration_emits_nothing() {
    let store = Arc::new(MemoryStore::default());
    store.add_block(block(1, BlockType::Proposal));
    store.add_block(block(2, BlockType::Abort));
    store.add_transaction(staking_tx("tx1", TxType::PAddValidator, 1, Some(2.0)));

    let report = worker(&store).run(&CancellationToken::new()).await.unwrap();
    assert_eq!(report.index, 2);
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn unknown_reward_reference_is_skipped() {
    let store = Arc::new(MemoryStore::default());
    store.add_block(block(1, BlockType::Proposal));
    store.add_block(block(2, BlockType::Abort));
    let mut reward = Transaction::new("tx9", TxType::PRewardValidator);
    reward.block = Some("b1".to_string());
    reward.reference_tx_id = Some("missing".to_string());
    store.add_transaction(reward);

    worker(&store).run(&CancellationToken::new()).await.unwrap();
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn empty_chain_reports_nothing_to_do() {
    let store = Arc::new(MemoryStore::default());
    let report = worker(&store).run(&CancellationToken::new()).await.unwrap();
    assert_eq!((report.index, report.lag), (0, 0));
    assert!(store.status(&format!("{}_events", P_CHAIN)).is_none());
}
