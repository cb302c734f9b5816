use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::AssetResponse;

/// Asset details; a failed count is logged and left out
pub async fn get_asset(state: &AppState, asset_id: &str) -> ApiResult<AssetResponse> {
    let asset = state.repositories.assets.find_by_id(asset_id).await?;

    let transactions_count = match state
        .repositories
        .assets
        .transactions_count(&asset.asset_id)
        .await
    {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::error!("Can't fetch transactions count for asset {}: {}", asset_id, err);
            None
        }
    };

    Ok(AssetResponse {
        asset,
        transactions_count,
    })
}
