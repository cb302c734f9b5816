// Address balances served straight from the node

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::handlers::AppState;
use crate::models::{AddressBalancesResponse, EvmBalanceResponse};

/// Which chain an address string refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Evm,
    Platform,
    Exchange,
    Bare,
}

pub fn address_kind(address: &str) -> AddressKind {
    match address.chars().next() {
        Some('0') => AddressKind::Evm,
        Some('P') => AddressKind::Platform,
        Some('X') => AddressKind::Exchange,
        _ => AddressKind::Bare,
    }
}

fn parse_height(height: Option<&str>) -> ApiResult<Option<u64>> {
    match height.filter(|h| !h.is_empty()) {
        None => Ok(None),
        Some(h) => h
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request("invalid height value")),
    }
}

pub async fn get_balances(
    state: &AppState,
    address: &str,
    height: Option<&str>,
) -> ApiResult<Value> {
    let node = &state.node;
    let response = match address_kind(address) {
        AddressKind::Evm => {
            let height = parse_height(height)?;
            let balance = node.evm_balance(address, height).await?;
            serde_json::to_value(EvmBalanceResponse { balance, height })
        }
        AddressKind::Platform => Ok(node.platform_balance(address).await?),
        AddressKind::Exchange => Ok(node.exchange_balances(address).await?),
        AddressKind::Bare => {
            let platform_address = format!("P-{}", address);
            let mut platform = node.platform_balance(&platform_address).await?;
            let staked = node.platform_stake(&platform_address).await?;
            if let Value::Object(map) = &mut platform {
                map.insert("staked".to_string(), staked);
            }
            let exchange = node.exchange_balances(&format!("X-{}", address)).await?;
            serde_json::to_value(AddressBalancesResponse { platform, exchange })
        }
    };
    response.map_err(|e| ApiError::Internal(e.to_string()))
}
