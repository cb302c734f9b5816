use std::collections::HashMap;
use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::runner::{run_worker, WorkerTimings};
use super::Worker;
use crate::utils::logging;

/// Owns the spawned sync tasks and the token that stops them
pub struct WorkerManager {
    cancel: CancellationToken,
    timings: WorkerTimings,
    tasks: HashMap<String, JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new(timings: WorkerTimings) -> Self {
        Self {
            cancel: CancellationToken::new(),
            timings,
            tasks: HashMap::new(),
        }
    }

    /// Token handed to every task started by this manager
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start a sync worker on its own task
    pub fn start_worker(&mut self, worker: Box<dyn Worker>) {
        let name = worker.name().to_string();
        let handle = tokio::spawn(run_worker(worker, self.timings, self.cancel.clone()));
        self.insert(name, handle);
    }

    /// Start any other long-running task. It must stop when the token fires.
    pub fn start_task<F>(&mut self, name: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.insert(name.to_string(), handle);
    }

    fn insert(&mut self, name: String, handle: JoinHandle<()>) {
        if let Some(previous) = self.tasks.insert(name.clone(), handle) {
            logging::log_warning(&format!("[{}] replaced a running task", name));
            previous.abort();
        }
    }

    pub fn running(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Cancel every task and wait for them to finish
    pub async fn stop_all(&mut self) {
        self.cancel.cancel();
        for (name, handle) in self.tasks.drain() {
            if let Err(e) = handle.await {
                logging::log_error(&format!("[{}] task ended abnormally: {}", name, e));
            }
        }
        logging::log_info("All workers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_all_waits_for_cancelled_tasks() {
        let mut manager = WorkerManager::new(WorkerTimings::default());
        let token = manager.cancel_token();
        manager.start_task("idle", async move { token.cancelled().await });
        assert_eq!(manager.running(), vec!["idle".to_string()]);

        manager.stop_all().await;
        assert!(manager.running().is_empty());
    }
}
