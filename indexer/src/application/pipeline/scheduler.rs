use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::MetricsPipeline;
use crate::domain::ports::MetricsStore;
use crate::utils::logging;

/// Runs the pipeline on a fixed interval, at most one run at a time
pub struct MetricsScheduler {
    pipeline: Arc<MetricsPipeline>,
    interval: Duration,
}

impl MetricsScheduler {
    pub fn new(pipeline: MetricsPipeline, interval: Duration) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            interval,
        }
    }

    /// Tick until `cancel` fires. A tick that lands while a run is in flight is skipped.
    pub async fn run(self, cancel: CancellationToken) {
        logging::log_info(&format!(
            "[pipeline] scheduler started, interval {}s",
            self.interval.as_secs()
        ));

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                logging::log_warning("[pipeline] previous run still in flight, skipping tick");
                continue;
            }

            let pipeline = self.pipeline.clone();
            in_flight = Some(tokio::spawn(async move {
                if let Err(e) = pipeline.run().await {
                    logging::log_error(&format!("[pipeline] run failed: {}", e));
                }
            }));
        }

        if let Some(handle) = in_flight {
            let _ = handle.await;
        }
        logging::log_info("[pipeline] scheduler stopped");
    }
}

/// Periodically delete validator samples older than `max_age`
pub async fn run_purge(
    store: Arc<dyn MetricsStore>,
    interval: Duration,
    max_age: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let max_age = match chrono::Duration::from_std(max_age) {
            Ok(age) => age,
            Err(e) => {
                logging::log_error(&format!("[purge] invalid max age: {}", e));
                break;
            }
        };
        match store.purge_validator_seqs(Utc::now() - max_age).await {
            Ok(deleted) => {
                logging::log_info(&format!("[purge] removed {} validator samples", deleted))
            }
            Err(e) => logging::log_error(&format!("[purge] failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::{MetricsPayload, Stage};
    use crate::domain::errors::PipelineError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Slow {
        started: Arc<AtomicUsize>,
        takes: Duration,
    }

    #[async_trait]
    impl Stage for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn run(&self, _payload: &mut MetricsPayload) -> Result<(), PipelineError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.takes).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_ticks_are_skipped() {
        let started = Arc::new(AtomicUsize::new(0));
        let pipeline = MetricsPipeline::new(vec![Box::new(Slow {
            started: started.clone(),
            takes: Duration::from_secs(150),
        })]);
        let scheduler = MetricsScheduler::new(pipeline, Duration::from_secs(60));

        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(200)).await;
            stopper.cancel();
        });

        // runs start at 0s and 180s; ticks at 60s and 120s hit the first run
        scheduler.run(cancel).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }
}
