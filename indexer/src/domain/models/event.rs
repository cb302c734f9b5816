use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{EventScope, EventType, ItemType};
use crate::infrastructure::codec::ids::Id;

/// A staking or network event derived from persisted platform transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub chain: String,
    pub block_hash: String,
    pub block_height: u64,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    pub scope: EventScope,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub item_id: String,
    pub item_type: ItemType,
    pub data: Map<String, Value>,
}

impl Event {
    /// Content-derived id. The same event derived twice gets the same id.
    pub fn derive_id(
        scope: EventScope,
        event_type: EventType,
        tx_hash: &str,
        item_id: &str,
        item_type: ItemType,
    ) -> String {
        let key = format!(
            "{}{}{}{}{}",
            scope.as_str(),
            event_type.as_str(),
            tx_hash,
            item_id,
            item_type.as_str()
        );
        Id::digest(key.as_bytes()).to_string()
    }

    /// Fill in the id from the other fields
    pub fn with_derived_id(mut self) -> Self {
        self.id = Self::derive_id(
            self.scope,
            self.event_type,
            &self.tx_hash,
            &self.item_id,
            self.item_type,
        );
        self
    }
}
