use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable cursor of one sync stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Stream key, e.g. a chain id or `<chain>_events`
    pub id: String,
    /// Last processed position
    pub index_id: u64,
    pub index_time: DateTime<Utc>,
    /// Highest position known on the node
    pub tip_id: u64,
    pub tip_time: DateTime<Utc>,
}

impl SyncStatus {
    /// Fresh cursor for a stream seen for the first time
    pub fn seed(id: impl Into<String>, tip_id: u64, tip_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            index_id: 0,
            index_time: DateTime::<Utc>::default(),
            tip_id,
            tip_time,
        }
    }

    pub fn at_tip(&self) -> bool {
        self.index_id >= self.tip_id
    }

    pub fn next_id(&self) -> u64 {
        self.index_id + 1
    }

    pub fn lag(&self) -> u64 {
        self.tip_id.saturating_sub(self.index_id)
    }

    /// Move the index forward. Positions behind the current index are ignored.
    pub fn advance(&mut self, index_id: u64, index_time: DateTime<Utc>) {
        if index_id < self.index_id {
            return;
        }
        self.index_id = index_id;
        self.index_time = index_time;
        if self.tip_id < index_id {
            self.tip_id = index_id;
            self.tip_time = index_time;
        }
    }

    /// Record the latest remote tip without touching the index
    pub fn refresh_tip(&mut self, tip_id: u64, tip_time: DateTime<Utc>) {
        self.tip_id = tip_id;
        self.tip_time = tip_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_and_tip() {
        let mut status = SyncStatus::seed("X", 10, Utc::now());
        assert_eq!(status.next_id(), 1);
        assert_eq!(status.lag(), 10);
        assert!(!status.at_tip());

        status.advance(10, Utc::now());
        assert!(status.at_tip());
        assert_eq!(status.lag(), 0);
    }

    #[test]
    fn advance_never_moves_backwards() {
        let mut status = SyncStatus::seed("P", 10, Utc::now());
        status.advance(7, Utc::now());
        status.advance(3, Utc::now());
        assert_eq!(status.index_id, 7);
    }

    #[test]
    fn index_past_stale_tip_lifts_the_tip() {
        let mut status = SyncStatus::seed("C", 2, Utc::now());
        status.advance(5, Utc::now());
        assert_eq!(status.tip_id, 5);
        assert!(status.at_tip());
    }
}
