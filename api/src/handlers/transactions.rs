// Handlers for transaction-related API endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::entity::transaction_outputs;
use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::{ChainQuery, TransactionData, TxSearchParams, TxTraceResponse, TypeCount};
use crate::services::transaction_service;

async fn search(state: &AppState, params: TxSearchParams) -> ApiResult<Vec<TransactionData>> {
    let search = params.validate()?;
    Ok(state.repositories.transactions.search(&search).await?)
}

/// Handler for GET /transactions
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(params): Query<TxSearchParams>,
) -> ApiResult<Json<Vec<TransactionData>>> {
    Ok(Json(search(&state, params).await?))
}

/// Handler for POST /transactions, the same search with a JSON body
pub async fn search_transactions(
    State(state): State<AppState>,
    Json(params): Json<TxSearchParams>,
) -> ApiResult<Json<Vec<TransactionData>>> {
    Ok(Json(search(&state, params).await?))
}

/// Handler for GET /transactions/{id}
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionData>> {
    Ok(Json(state.repositories.transactions.find_by_id(&id).await?))
}

/// Handler for GET /transactions/{id}/trace
pub async fn get_transaction_trace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TxTraceResponse>> {
    Ok(Json(transaction_service::get_trace(&state, &id).await?))
}

/// Handler for GET /transaction_outputs/{id}
pub async fn get_transaction_output(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<transaction_outputs::Model>> {
    Ok(Json(state.repositories.transactions.find_output(&id).await?))
}

/// Handler for GET /transaction_types
pub async fn get_transaction_types(
    State(state): State<AppState>,
    Query(params): Query<ChainQuery>,
) -> ApiResult<Json<Vec<TypeCount>>> {
    Ok(Json(
        state
            .repositories
            .transactions
            .type_counts(params.chain())
            .await?,
    ))
}
