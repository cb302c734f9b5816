use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::{RunReport, Worker};
use crate::application::sync::{CachedTip, SyncCursor};
use crate::domain::errors::SyncError;
use crate::domain::models::{EvmReceipt, EvmTrace};
use crate::domain::ports::{EvmSource, EvmStore, PendingEvmTx, Tip};
use crate::utils::logging;

/// Paging and fan-out of the EVM worker
#[derive(Debug, Clone, Copy)]
pub struct EvmWorkerSettings {
    /// Heights per window and transactions per page
    pub page_size: u64,
    /// Receipt and trace requests in flight at once
    pub concurrency: usize,
    pub tip_ttl: Duration,
}

impl Default for EvmWorkerSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            concurrency: 100,
            tip_ttl: Duration::from_secs(10),
        }
    }
}

/// Fetches receipts and call traces of persisted EVM transactions
pub struct EvmWorker {
    stream: String,
    chain: String,
    source: Arc<dyn EvmSource>,
    store: Arc<dyn EvmStore>,
    cursor: SyncCursor,
    settings: EvmWorkerSettings,
    latest: CachedTip<u64>,
}

type Fetched = HashMap<String, (EvmReceipt, EvmTrace)>;

impl EvmWorker {
    pub fn new(
        chain: impl Into<String>,
        source: Arc<dyn EvmSource>,
        store: Arc<dyn EvmStore>,
        cursor: SyncCursor,
        settings: EvmWorkerSettings,
    ) -> Self {
        let chain = chain.into();
        Self {
            stream: format!("{}_evm", chain),
            chain,
            source,
            store,
            cursor,
            latest: CachedTip::new(settings.tip_ttl),
            settings: EvmWorkerSettings {
                page_size: settings.page_size.max(1),
                concurrency: settings.concurrency.max(1),
                ..settings
            },
        }
    }

    /// Receipt and trace of every transaction of `page`, keyed by transaction id.
    /// Any failed request fails the whole page.
    async fn fetch_page(&self, page: &[PendingEvmTx]) -> Result<Fetched, SyncError> {
        let permits = Arc::new(Semaphore::new(self.settings.concurrency));
        let mut pending = FuturesUnordered::new();

        for tx in page {
            let source = self.source.clone();
            let permits = permits.clone();
            let id = tx.id.clone();
            pending.push(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| SyncError::ProcessingError(e.to_string()))?;
                let receipt = source.receipt(&id).await.map_err(|e| {
                    logging::log_error(&format!("receipt fetch failed for {}: {}", id, e));
                    e
                })?;
                let trace = source.trace(&id).await.map_err(|e| {
                    logging::log_error(&format!("trace fetch failed for {}: {}", id, e));
                    e
                })?;
                Ok::<_, SyncError>((id, receipt, trace))
            });
        }

        let mut fetched = HashMap::with_capacity(page.len());
        while let Some(result) = pending.next().await {
            let (id, receipt, trace) = result?;
            fetched.insert(id, (receipt, trace));
        }
        Ok(fetched)
    }

    /// Height the worker may advance to: the node's newest block, bounded by
    /// what the chain worker has already persisted
    async fn tip_height(&mut self) -> Result<Option<u64>, SyncError> {
        let source = self.source.clone();
        let latest = self
            .latest
            .get_or_fetch(move || async move { source.latest_height().await })
            .await?;
        let persisted = self.store.last_block_height(&self.chain).await?;
        Ok(persisted.map(|h| h.min(latest)))
    }
}

#[async_trait]
impl Worker for EvmWorker {
    fn name(&self) -> &str {
        &self.stream
    }

    async fn run(&mut self, cancel: &CancellationToken) -> Result<RunReport, SyncError> {
        let Some(tip_height) = self.tip_height().await? else {
            return Ok(RunReport { index: 0, lag: 0 });
        };
        let tip = Tip {
            index: tip_height,
            time: Utc::now(),
        };

        let mut status = self.cursor.get_or_init(&self.stream, tip).await?;
        if status.tip_id != tip.index {
            self.cursor.refresh_tip(&mut status, tip).await?;
        }
        if status.at_tip() {
            return Ok(RunReport::from(&status));
        }

        let page_size = self.settings.page_size;
        let start = status.next_id();
        let end = (start + page_size).min(tip_height);
        let mut offset = 0;

        loop {
            if cancel.is_cancelled() {
                return Ok(RunReport::from(&status));
            }

            let page = self
                .store
                .evm_transactions(&self.chain, start, end, page_size, offset)
                .await?;
            if page.is_empty() {
                break;
            }

            let mut fetched = self.fetch_page(&page).await?;
            let (receipts, traces): (Vec<EvmReceipt>, Vec<EvmTrace>) = page
                .iter()
                .filter_map(|tx| fetched.remove(&tx.id))
                .unzip();
            self.store.save_traces(&traces).await?;
            self.store.save_receipts(&receipts).await?;

            if (page.len() as u64) < page_size {
                break;
            }
            offset += page_size;
        }

        self.cursor.advance(&mut status, end, Utc::now()).await?;
        Ok(RunReport::from(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SyncStatus;
    use crate::domain::ports::SyncStatusStore;
    use crate::infrastructure::node::NodeClientError;
    use crate::infrastructure::persistence::error::DbError;
    use serde_json::json;
    use std::sync::Mutex;

    struct Node {
        latest: u64,
        failing: Option<String>,
    }

    #[async_trait]
    impl EvmSource for Node {
        async fn latest_height(&self) -> Result<u64, NodeClientError> {
            Ok(self.latest)
        }

        async fn receipt(&self, tx_hash: &str) -> Result<EvmReceipt, NodeClientError> {
            if self.failing.as_deref() == Some(tx_hash) {
                return Err(NodeClientError::NotFound(tx_hash.to_string()));
            }
            Ok(EvmReceipt {
                id: tx_hash.to_string(),
                receipt_type: 2,
                status: 1,
                contract_address: None,
                logs: Vec::new(),
            })
        }

        async fn trace(&self, tx_hash: &str) -> Result<EvmTrace, NodeClientError> {
            Ok(EvmTrace {
                id: tx_hash.to_string(),
                data: json!([]),
                created_at: Utc::now(),
            })
        }
    }

    #[derive(Default)]
    struct Store {
        txs: Vec<PendingEvmTx>,
        receipts: Mutex<Vec<String>>,
        traces: Mutex<Vec<String>>,
        statuses: Mutex<HashMap<String, SyncStatus>>,
    }

    #[async_trait]
    impl EvmStore for Store {
        async fn last_block_height(&self, _chain: &str) -> Result<Option<u64>, DbError> {
            Ok(self.txs.iter().map(|t| t.block_height).max())
        }

        async fn evm_transactions(
            &self,
            _chain: &str,
            start_height: u64,
            end_height: u64,
            limit: u64,
            offset: u64,
        ) -> Result<Vec<PendingEvmTx>, DbError> {
            Ok(self
                .txs
                .iter()
                .filter(|t| t.block_height >= start_height && t.block_height <= end_height)
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn save_receipts(&self, receipts: &[EvmReceipt]) -> Result<(), DbError> {
            let mut saved = self.receipts.lock().unwrap();
            saved.extend(receipts.iter().map(|r| r.id.clone()));
            Ok(())
        }

        async fn save_traces(&self, traces: &[EvmTrace]) -> Result<(), DbError> {
            let mut saved = self.traces.lock().unwrap();
            saved.extend(traces.iter().map(|t| t.id.clone()));
            Ok(())
        }
    }

    #[async_trait]
    impl SyncStatusStore for Store {
        async fn get_sync_status(&self, id: &str) -> Result<SyncStatus, DbError> {
            self.statuses
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or(DbError::NotFound)
        }

        async fn update_sync_status(&self, status: &SyncStatus) -> Result<(), DbError> {
            self.statuses
                .lock()
                .unwrap()
                .insert(status.id.clone(), status.clone());
            Ok(())
        }
    }

    fn store_with(count: u64) -> Arc<Store> {
        Arc::new(Store {
            txs: (1..=count)
                .map(|h| PendingEvmTx {
                    id: format!("0x{:02x}", h),
                    block_height: h,
                })
                .collect(),
            ..Default::default()
        })
    }

    fn worker(store: Arc<Store>, failing: Option<&str>, page_size: u64) -> EvmWorker {
        let node = Arc::new(Node {
            latest: 1_000,
            failing: failing.map(str::to_string),
        });
        EvmWorker::new(
            "C",
            node,
            store.clone(),
            SyncCursor::new(store),
            EvmWorkerSettings {
                page_size,
                concurrency: 3,
                tip_ttl: Duration::from_secs(10),
            },
        )
    }

    #[tokio::test]
    async fn pages_through_window_then_advances() {
        let store = store_with(5);
        let mut worker = worker(store.clone(), None, 2);
        let cancel = CancellationToken::new();

        let report = worker.run(&cancel).await.unwrap();
        // window [1, 3]
        assert_eq!(report.index, 3);
        assert_eq!(store.receipts.lock().unwrap().len(), 3);

        let report = worker.run(&cancel).await.unwrap();
        assert_eq!(report.index, 5);
        assert!(report.at_tip());
        assert_eq!(store.traces.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn failed_fetch_commits_nothing_from_the_page() {
        let store = store_with(3);
        let mut worker = worker(store.clone(), Some("0x02"), 10);

        let err = worker.run(&CancellationToken::new()).await;
        assert!(err.is_err());
        assert!(store.receipts.lock().unwrap().is_empty());
        let status = store.statuses.lock().unwrap().get("C_evm").cloned().unwrap();
        assert_eq!(status.index_id, 0);
    }
}
