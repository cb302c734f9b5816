// Health and sync status of the indexer

use chrono::{DateTime, Duration, Utc};

use crate::error::{ApiError, ApiResult};
use crate::handlers::AppState;
use crate::models::{HealthResponse, StatusResponse};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Samples older than this mark the sync as stale
const STALE_AFTER_MINUTES: i64 = 5;

/// Database and node must both answer
pub async fn check_health(state: &AppState) -> ApiResult<HealthResponse> {
    state
        .repositories
        .chains
        .ping()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    state
        .node
        .node_version()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(HealthResponse { healthy: true })
}

pub fn sync_status(last_sample: Option<DateTime<Utc>>, now: DateTime<Utc>) -> &'static str {
    match last_sample {
        None => "error",
        Some(time) if now - time < Duration::minutes(STALE_AFTER_MINUTES) => "current",
        Some(_) => "stale",
    }
}

/// Never fails: lookups that error are logged and reported as missing
pub async fn get_status(state: &AppState) -> StatusResponse {
    let sync_time = match state.repositories.validators.last_sample_time().await {
        Ok(time) => time,
        Err(err) => {
            tracing::error!("Can't fetch last validator sample time: {}", err);
            None
        }
    };

    let node_version = state.node.node_version().await.unwrap_or_else(|err| {
        tracing::error!("Can't fetch node version: {}", err);
        "-".to_string()
    });
    let network_name = state.node.network_name().await.unwrap_or_else(|err| {
        tracing::error!("Can't fetch network name: {}", err);
        "-".to_string()
    });

    StatusResponse {
        app_name: APP_NAME,
        app_version: APP_VERSION,
        sync_status: sync_status(sync_time, Utc::now()).to_string(),
        sync_time,
        node_version,
        network_name,
    }
}
