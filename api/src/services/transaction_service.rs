// Transaction trace assembly

use serde_json::Value;

use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::TxTraceResponse;

/// Receipt, logs and call trace of a contract chain transaction.
/// Missing parts are left empty.
pub async fn get_trace(state: &AppState, tx_id: &str) -> ApiResult<TxTraceResponse> {
    let mut response = TxTraceResponse::default();

    if let Some(trace) = state.repositories.evm.trace(tx_id).await? {
        response.trace = Some(trace.data);
    }

    if let Some(receipt) = state.repositories.evm.receipt(tx_id).await? {
        response.logs = match &receipt.logs {
            Value::Array(logs) => logs.clone(),
            _ => Vec::new(),
        };
        response.receipt = Some(receipt);
    }

    Ok(response)
}
