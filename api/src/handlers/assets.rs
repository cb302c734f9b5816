// Handlers for chain and asset endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::entity::{assets, chains};
use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::{AssetQuery, AssetResponse};
use crate::services::asset_service;

/// Handler for GET /chains
pub async fn get_chains(State(state): State<AppState>) -> ApiResult<Json<Vec<chains::Model>>> {
    Ok(Json(state.repositories.chains.find_all().await?))
}

/// Handler for GET /assets
pub async fn get_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetQuery>,
) -> ApiResult<Json<Vec<assets::Model>>> {
    let asset_type = params.asset_type.as_deref().filter(|t| !t.is_empty());
    Ok(Json(state.repositories.assets.find_all(asset_type).await?))
}

/// Handler for GET /assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<AssetResponse>> {
    Ok(Json(asset_service::get_asset(&state, &asset_id).await?))
}
