use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::entity::blocks;
use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::BlockSearchParams;

/// Handler for GET /blocks
pub async fn get_blocks(
    State(state): State<AppState>,
    Query(params): Query<BlockSearchParams>,
) -> ApiResult<Json<Vec<blocks::Model>>> {
    let search = params.validate()?;
    Ok(Json(state.repositories.blocks.search(&search).await?))
}

/// Handler for GET /blocks/{id}
pub async fn get_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<blocks::Model>> {
    Ok(Json(state.repositories.blocks.find_by_id(&id).await?))
}
