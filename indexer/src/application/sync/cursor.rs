//! Durable per-stream cursors.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::domain::errors::SyncError;
use crate::domain::models::SyncStatus;
use crate::domain::ports::{SyncStatusStore, Tip};

/// Reads, seeds and advances the sync status of a stream
#[derive(Clone)]
pub struct SyncCursor {
    store: Arc<dyn SyncStatusStore>,
}

impl SyncCursor {
    pub fn new(store: Arc<dyn SyncStatusStore>) -> Self {
        Self { store }
    }

    /// Persisted status of `stream`. A stream seen for the first time is seeded
    /// at index 0 with `tip` and persisted before it is returned.
    pub async fn get_or_init(&self, stream: &str, tip: Tip) -> Result<SyncStatus, SyncError> {
        match self.store.get_sync_status(stream).await {
            Ok(status) => Ok(status),
            Err(e) if e.is_not_found() => {
                let status = SyncStatus::seed(stream, tip.index, tip.time);
                self.store.update_sync_status(&status).await?;
                Ok(status)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Move the index to a persisted position and store the cursor
    pub async fn advance(
        &self,
        status: &mut SyncStatus,
        index_id: u64,
        index_time: DateTime<Utc>,
    ) -> Result<(), SyncError> {
        status.advance(index_id, index_time);
        self.save(status).await
    }

    /// Record the node's current tip. Stored only when it changed.
    pub async fn refresh_tip(&self, status: &mut SyncStatus, tip: Tip) -> Result<(), SyncError> {
        if status.tip_id == tip.index && status.tip_time == tip.time {
            return Ok(());
        }
        status.refresh_tip(tip.index, tip.time);
        self.save(status).await
    }

    pub async fn save(&self, status: &SyncStatus) -> Result<(), SyncError> {
        self.store.update_sync_status(status).await?;
        Ok(())
    }
}

/// Remote tip reused for `ttl` before the node is asked again
#[derive(Debug)]
pub struct CachedTip<T> {
    ttl: Duration,
    cached: Option<(T, Instant)>,
}

impl<T: Clone> CachedTip<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, cached: None }
    }

    /// Cached value while fresh, otherwise the result of `fetch`
    pub async fn get_or_fetch<F, Fut, E>(&mut self, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some((value, at)) = &self.cached {
            if at.elapsed() < self.ttl {
                return Ok(value.clone());
            }
        }
        let value = fetch().await?;
        self.cached = Some((value.clone(), Instant::now()));
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::error::DbError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<String, SyncStatus>>,
        writes: Mutex<usize>,
    }

    #[async_trait]
    impl SyncStatusStore for MemoryStore {
        async fn get_sync_status(&self, id: &str) -> Result<SyncStatus, DbError> {
            self.rows
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or(DbError::NotFound)
        }

        async fn update_sync_status(&self, status: &SyncStatus) -> Result<(), DbError> {
            *self.writes.lock().unwrap() += 1;
            self.rows
                .lock()
                .unwrap()
                .insert(status.id.clone(), status.clone());
            Ok(())
        }
    }

    fn tip(index: u64) -> Tip {
        Tip {
            index,
            time: DateTime::<Utc>::from_timestamp(1_600_000_000 + index as i64, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn first_read_seeds_from_tip() {
        let store = Arc::new(MemoryStore::default());
        let cursor = SyncCursor::new(store.clone());

        let status = cursor.get_or_init("X", tip(42)).await.unwrap();
        assert_eq!(status.index_id, 0);
        assert_eq!(status.tip_id, 42);
        assert!(store.rows.lock().unwrap().contains_key("X"));

        let again = cursor.get_or_init("X", tip(50)).await.unwrap();
        assert_eq!(again.tip_id, 42);
    }

    #[tokio::test]
    async fn unchanged_tip_is_not_rewritten() {
        let store = Arc::new(MemoryStore::default());
        let cursor = SyncCursor::new(store.clone());
        let mut status = cursor.get_or_init("P", tip(3)).await.unwrap();
        let writes = *store.writes.lock().unwrap();

        cursor.refresh_tip(&mut status, tip(3)).await.unwrap();
        assert_eq!(*store.writes.lock().unwrap(), writes);

        cursor.refresh_tip(&mut status, tip(9)).await.unwrap();
        assert_eq!(*store.writes.lock().unwrap(), writes + 1);
        assert_eq!(status.index_id, 0);
        assert_eq!(status.tip_id, 9);
    }

    #[tokio::test]
    async fn cached_tip_is_reused_within_ttl() {
        let mut cache = CachedTip::new(Duration::from_secs(60));
        let first: Result<u64, ()> = cache.get_or_fetch(|| async { Ok(1) }).await;
        let second: Result<u64, ()> = cache.get_or_fetch(|| async { Ok(2) }).await;
        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(1));

        cache.invalidate();
        let third: Result<u64, ()> = cache.get_or_fetch(|| async { Ok(3) }).await;
        assert_eq!(third, Ok(3));
    }

    #[tokio::test]
    async fn zero_ttl_always_fetches() {
        let mut cache = CachedTip::new(Duration::ZERO);
        let _: Result<u64, ()> = cache.get_or_fetch(|| async { Ok(1) }).await;
        let second: Result<u64, ()> = cache.get_or_fetch(|| async { Ok(2) }).await;
        assert_eq!(second, Ok(2));
    }
}
