mod common;

use std::sync::Arc;

use avalanche_indexer::application::sync::mapper::XChainMapper;
use avalanche_indexer::application::sync::{
    ContainerFetcher, MapperContext, PersistenceWriter, SyncCursor,
};
use avalanche_indexer::application::workers::{ChainWorker, Worker};
use avalanche_indexer::domain::models::TxType;
use avalanche_indexer::domain::ports::RawContainer;
use avalanche_indexer::infrastructure::codec::{CodecConfig, Id, ShortId};
use tokio_util::sync::CancellationToken;

use common::{at, MemorySource, MemoryStore, TxBytes};

const X_CHAIN: &str = "2oYMBNV4eNHyqk2fjjV5nVQLDbtmNJzq5s3qs3Lo6ftnC6FByM";

struct Fixture {
    avax: Id,
    first: Vec<u8>,
    second: Vec<u8>,
}

/// `first` pays 900 out of 1000; `second` spends that output and claims 950
fn fixture() -> Fixture {
    let avax = Id::digest(b"avax");
    let chain = Id::digest(b"x-chain");
    let funding = Id::digest(b"funding");
    let owner = ShortId([7u8; 20]);

    let first = TxBytes::base_tx(&chain, &avax, 900, &owner, (&funding, 0, 1_000));
    let first_id = Id::digest(&first);
    let second = TxBytes::base_tx(&chain, &avax, 950, &owner, (&first_id, 0, 900));
    Fixture {
        avax,
        first,
        second,
    }
}

fn raw(index: u64, bytes: &[u8]) -> RawContainer {
    RawContainer {
        index,
        id: Id::digest(bytes).to_string(),
        bytes: bytes.to_vec(),
        timestamp: at(1_650_000_000 + index as i64),
    }
}

fn worker(source: Arc<MemorySource>, store: Arc<MemoryStore>, avax: &Id) -> ChainWorker {
    let ctx = MapperContext::new(X_CHAIN, 1, avax.to_string(), "avax").unwrap();
    ChainWorker::new(
        ContainerFetcher::new(source, 10),
        Arc::new(XChainMapper::new(ctx, CodecConfig::avm())),
        PersistenceWriter::new(store.clone()),
        SyncCursor::new(store),
    )
}

#[tokio::test]
async fn spending_marks_the_consumed_output() {
    let f = fixture();
    let source = Arc::new(MemorySource::new(vec![raw(1, &f.first), raw(2, &f.second)]));
    let store = Arc::new(MemoryStore::default());
    let mut worker = worker(source, store.clone(), &f.avax);

    worker.run(&CancellationToken::new()).await.unwrap();

    let first_id = Id::digest(&f.first);
    let second_id = Id::digest(&f.second).to_string();
    let spent_output = first_id.prefix(0).to_string();

    store.with(|s| {
        let output = &s.outputs[&spent_output];
        assert!(output.spent);
        assert_eq!(output.spent_tx_id.as_deref(), Some(second_id.as_str()));
        assert_eq!(output.chain, X_CHAIN);
        assert!(s.inputs.contains(&(spent_output.clone(), second_id.clone())));

        let fresh = Id::digest(&f.second).prefix(0).to_string();
        assert!(!s.outputs[&fresh].spent);

        let first = &s.transactions[&first_id.to_string()];
        assert_eq!(first.tx_type, TxType::XBase);
        assert_eq!(first.fee, 100);
        // more out than in: no negative fee
        assert_eq!(s.transactions[&second_id].fee, 0);
    });
}

#[tokio::test]
async fn replaying_containers_leaves_the_same_rows() {
    let f = fixture();
    let source = Arc::new(MemorySource::new(vec![raw(1, &f.first), raw(2, &f.second)]));
    let store = Arc::new(MemoryStore::default());
    let cancel = CancellationToken::new();

    worker(source.clone(), store.clone(), &f.avax).run(&cancel).await.unwrap();
    let snapshot = store.with(|s| (s.tx_order.clone(), s.outputs.clone(), s.inputs.clone()));

    // forget the cursor and sync everything again
    store.with(|s| s.statuses.clear());
    worker(source, store.clone(), &f.avax).run(&cancel).await.unwrap();

    let replayed = store.with(|s| (s.tx_order.clone(), s.outputs.clone(), s.inputs.clone()));
    assert_eq!(snapshot, replayed);
    assert_eq!(store.status(X_CHAIN).unwrap().index_id, 2);
}
