use serde::{Deserialize, Serialize};

use super::types::AssetType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub name: String,
    pub symbol: String,
    pub denomination: u8,
}

impl Asset {
    /// The network's native token
    pub fn native(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_type: AssetType::FixedCap,
            name: "Avalanche".to_string(),
            symbol: "AVAX".to_string(),
            denomination: 9,
        }
    }
}
