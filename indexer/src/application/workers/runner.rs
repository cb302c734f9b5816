use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::Worker;
use crate::utils::logging;

/// Delays between worker runs
#[derive(Debug, Clone, Copy)]
pub struct WorkerTimings {
    pub first_tick: Duration,
    /// After a run that left the stream behind the tip
    pub lagging: Duration,
    pub at_tip: Duration,
    pub after_error: Duration,
}

impl Default for WorkerTimings {
    fn default() -> Self {
        Self {
            first_tick: Duration::from_secs(1),
            lagging: Duration::from_millis(10),
            at_tip: Duration::from_secs(3),
            after_error: Duration::from_secs(1),
        }
    }
}

/// Run `worker` until `cancel` fires. Failed runs are logged and retried.
pub async fn run_worker(
    mut worker: Box<dyn Worker>,
    timings: WorkerTimings,
    cancel: CancellationToken,
) {
    let name = worker.name().to_string();
    logging::log_info(&format!("[{}] starting worker", name));

    let mut wait = timings.first_tick;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        wait = match worker.run(&cancel).await {
            Ok(report) => {
                logging::log_info(&format!(
                    "[{}] finished run: index={} lag={}",
                    name, report.index, report.lag
                ));
                if report.at_tip() {
                    timings.at_tip
                } else {
                    timings.lagging
                }
            }
            Err(e) => {
                logging::log_error(&format!("[{}] worker run failed: {}", name, e));
                timings.after_error
            }
        };
    }

    logging::log_info(&format!("[{}] worker stopped", name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workers::RunReport;
    use crate::domain::errors::SyncError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        runs: Arc<AtomicUsize>,
        stop_after: usize,
        cancel: CancellationToken,
    }

    #[async_trait]
    impl Worker for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn run(&mut self, _cancel: &CancellationToken) -> Result<RunReport, SyncError> {
            let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.stop_after {
                self.cancel.cancel();
            }
            if n == 1 {
                return Err(SyncError::ProcessingError("boom".to_string()));
            }
            Ok(RunReport { index: n as u64, lag: 0 })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_retried_until_cancelled() {
        let runs = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        let worker = Scripted {
            runs: runs.clone(),
            stop_after: 3,
            cancel: cancel.clone(),
        };

        run_worker(Box::new(worker), WorkerTimings::default(), cancel).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_before_first_tick() {
        let runs = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let worker = Scripted {
            runs: runs.clone(),
            stop_after: 1,
            cancel: cancel.clone(),
        };

        run_worker(Box::new(worker), WorkerTimings::default(), cancel).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
