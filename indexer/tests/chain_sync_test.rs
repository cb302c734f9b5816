mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use avalanche_indexer::application::sync::{
    ContainerFetcher, PersistenceWriter, SyncCursor,
};
use avalanche_indexer::application::workers::{ChainWorker, Worker};
use avalanche_indexer::domain::models::SyncStatus;
use tokio_util::sync::CancellationToken;

use common::{at, container, MemorySource, MemoryStore, StubDecoder};

fn worker(source: Arc<MemorySource>, store: Arc<MemoryStore>, batch: u64) -> ChainWorker {
    ChainWorker::new(
        ContainerFetcher::new(source, batch),
        Arc::new(StubDecoder),
        PersistenceWriter::new(store.clone()),
        SyncCursor::new(store),
    )
}

#[tokio::test]
async fn fresh_stream_catches_up_in_batches() {
    let source = Arc::new(MemorySource::new((1..=3).map(container).collect()));
    let store = Arc::new(MemoryStore::default());
    let mut worker = worker(source.clone(), store.clone(), 2);
    let cancel = CancellationToken::new();

    let first = worker.run(&cancel).await.unwrap();
    assert_eq!((first.index, first.lag), (2, 1));
    assert!(!first.at_tip());

    let second = worker.run(&cancel).await.unwrap();
    assert_eq!((second.index, second.lag), (3, 0));

    let status = store.status("x").unwrap();
    assert_eq!(status.index_id, 3);
    assert_eq!(status.tip_id, 3);
    assert_eq!(status.index_time, at(1_600_000_003));
    assert_eq!(store.with(|s| s.tx_order.clone()), vec!["c1", "c2", "c3"]);

    // nothing is fetched once the stream is at the tip
    let calls = source.calls();
    worker.run(&cancel).await.unwrap();
    assert_eq!(source.calls(), calls);
}

#[tokio::test]
async fn containers_are_persisted_in_index_order() {
    let source = Arc::new(MemorySource::new((1..=8).map(container).collect()));
    let store = Arc::new(MemoryStore::default());
    let mut seeded = SyncStatus::seed("x", 8, at(1_600_000_008));
    seeded.advance(4, at(1_600_000_004));
    store.seed_status(seeded);

    let mut worker = worker(source, store.clone(), 2);
    let cancel = CancellationToken::new();

    assert_eq!(worker.run(&cancel).await.unwrap().index, 6);
    assert_eq!(worker.run(&cancel).await.unwrap().index, 8);
    assert_eq!(store.with(|s| s.tx_order.clone()), vec!["c5", "c6", "c7", "c8"]);
}

#[tokio::test]
async fn gap_in_the_index_stops_the_stream() {
    let source = Arc::new(MemorySource::new(vec![container(1), container(3)]));
    let store = Arc::new(MemoryStore::default());
    let mut worker = worker(source, store.clone(), 2);
    let cancel = CancellationToken::new();

    assert_eq!(worker.run(&cancel).await.unwrap().index, 1);
    assert!(worker.run(&cancel).await.is_err());
    assert_eq!(store.status("x").unwrap().index_id, 1);
    assert_eq!(store.with(|s| s.tx_order.len()), 1);
}

#[tokio::test]
async fn undecodable_container_keeps_cursor_on_last_good_one() {
    let mut bad = container(2);
    bad.bytes = b"bad".to_vec();
    let source = Arc::new(MemorySource::new(vec![container(1), bad, container(3)]));
    let store = Arc::new(MemoryStore::default());
    let mut worker = worker(source, store.clone(), 10);
    let cancel = CancellationToken::new();

    assert!(worker.run(&cancel).await.is_err());
    assert_eq!(store.status("x").unwrap().index_id, 1);
    assert_eq!(store.with(|s| s.tx_order.clone()), vec!["c1"]);
}

#[tokio::test]
async fn cancelled_run_persists_nothing_new() {
    let source = Arc::new(MemorySource::new((1..=3).map(container).collect()));
    let store = Arc::new(MemoryStore::default());
    let mut worker = worker(source, store.clone(), 10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = worker.run(&cancel).await.unwrap();
    assert_eq!(report.index, 0);
    assert!(store.with(|s| s.tx_order.is_empty()));
}

#[tokio::test]
async fn node_tip_is_reused_within_its_ttl() {
    let source = Arc::new(MemorySource::new((1..=4).map(container).collect()));
    let store = Arc::new(MemoryStore::default());
    let cancel = CancellationToken::new();

    let mut cached =
        worker(source.clone(), store.clone(), 2).with_tip_ttl(Duration::from_secs(60));
    cached.run(&cancel).await.unwrap();
    let report = cached.run(&cancel).await.unwrap();
    assert_eq!((report.index, report.lag), (4, 0));
    assert_eq!(source.tip_calls.load(Ordering::SeqCst), 1);

    let mut uncached = worker(source.clone(), store, 2).with_tip_ttl(Duration::ZERO);
    uncached.run(&cancel).await.unwrap();
    uncached.run(&cancel).await.unwrap();
    assert_eq!(source.tip_calls.load(Ordering::SeqCst), 3);
}
