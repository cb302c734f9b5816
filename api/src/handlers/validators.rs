// Handlers for validator, delegation and network stats endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::entity::{delegations, network_stats, validators};
use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::{
    DelegationSearchParams, NetworkStatsParams, ValidatorResponse, ValidatorSearchParams,
};
use crate::services::validator_service;

/// Handler for GET /network_stats
pub async fn get_network_stats(
    State(state): State<AppState>,
    Query(params): Query<NetworkStatsParams>,
) -> ApiResult<Json<Vec<network_stats::Model>>> {
    let (bucket, limit) = params.validate()?;
    Ok(Json(state.repositories.network.stats(bucket, limit).await?))
}

/// Handler for GET /validators
pub async fn get_validators(
    State(state): State<AppState>,
    Query(params): Query<ValidatorSearchParams>,
) -> ApiResult<Json<Vec<validators::Model>>> {
    let search = params.validate()?;
    Ok(Json(state.repositories.validators.search(&search).await?))
}

/// Handler for GET /validators/{id}
pub async fn get_validator(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> ApiResult<Json<ValidatorResponse>> {
    Ok(Json(validator_service::get_validator(&state, &node_id).await?))
}

/// Handler for GET /delegations
pub async fn get_delegations(
    State(state): State<AppState>,
    Query(params): Query<DelegationSearchParams>,
) -> ApiResult<Json<Vec<delegations::Model>>> {
    Ok(Json(state.repositories.validators.delegations(&params).await?))
}
