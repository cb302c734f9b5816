use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{RunReport, Worker};
use crate::application::sync::{
    CachedTip, ContainerDecoder, ContainerFetcher, PersistenceWriter, SyncCursor,
};
use crate::domain::errors::SyncError;
use crate::domain::ports::Tip;
use crate::utils::logging;

/// Follows one chain's container index: fetch, decode, persist, advance
pub struct ChainWorker {
    stream: String,
    fetcher: ContainerFetcher,
    decoder: Arc<dyn ContainerDecoder>,
    writer: PersistenceWriter,
    cursor: SyncCursor,
    tip: CachedTip<Tip>,
}

impl ChainWorker {
    pub fn new(
        fetcher: ContainerFetcher,
        decoder: Arc<dyn ContainerDecoder>,
        writer: PersistenceWriter,
        cursor: SyncCursor,
    ) -> Self {
        Self {
            stream: decoder.chain().to_string(),
            fetcher,
            decoder,
            writer,
            cursor,
            tip: CachedTip::new(Duration::from_secs(10)),
        }
    }

    /// How long the node's last accepted container is reused between runs
    pub fn with_tip_ttl(mut self, ttl: Duration) -> Self {
        self.tip = CachedTip::new(ttl);
        self
    }
}

#[async_trait]
impl Worker for ChainWorker {
    fn name(&self) -> &str {
        &self.stream
    }

    async fn run(&mut self, cancel: &CancellationToken) -> Result<RunReport, SyncError> {
        let fetcher = &self.fetcher;
        let tip = self.tip.get_or_fetch(|| fetcher.tip()).await?;
        let mut status = self.cursor.get_or_init(&self.stream, tip).await?;
        self.cursor.refresh_tip(&mut status, tip).await?;

        if status.at_tip() {
            return Ok(RunReport::from(&status));
        }

        let containers = self.fetcher.fetch_range(status.next_id()).await?;
        for container in containers {
            if cancel.is_cancelled() {
                break;
            }

            let decoded = self.decoder.decode(&container).map_err(|e| {
                logging::log_error(&format!(
                    "[{}] cannot decode container {} ({}): {}",
                    self.stream, container.index, container.id, e
                ));
                e
            })?;
            self.writer.persist(&decoded).await?;
            self.cursor
                .advance(&mut status, container.index, container.timestamp)
                .await?;
        }

        Ok(RunReport::from(&status))
    }
}
