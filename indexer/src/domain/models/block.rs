use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::BlockType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub parent: String,
    pub chain: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub height: u64,
    pub timestamp: DateTime<Utc>,
}
