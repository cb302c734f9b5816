//! Long-running sync workers and the manager that owns their tasks.

pub mod chain_worker;
pub mod events_worker;
pub mod evm_worker;
pub mod manager;
pub mod runner;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::SyncError;
use crate::domain::models::SyncStatus;

pub use chain_worker::ChainWorker;
pub use events_worker::EventsWorker;
pub use evm_worker::EvmWorker;
pub use manager::WorkerManager;
pub use runner::{run_worker, WorkerTimings};

/// Where a worker stands after one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub index: u64,
    pub lag: u64,
}

impl RunReport {
    pub fn at_tip(&self) -> bool {
        self.lag == 0
    }
}

impl From<&SyncStatus> for RunReport {
    fn from(status: &SyncStatus) -> Self {
        Self {
            index: status.index_id,
            lag: status.lag(),
        }
    }
}

/// One sync stream, driven by [`run_worker`]
#[async_trait]
pub trait Worker: Send {
    /// Stream key, used in logs
    fn name(&self) -> &str;

    /// Advance the stream as far as one batch allows. Stops early once
    /// `cancel` fires, keeping whatever was already persisted.
    async fn run(&mut self, cancel: &CancellationToken) -> Result<RunReport, SyncError>;
}
