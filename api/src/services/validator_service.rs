use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::{DelegationSearchParams, StatsBucket, ValidatorResponse};

/// Validator with its active delegations, a day of hourly and a month of daily stats
pub async fn get_validator(state: &AppState, node_id: &str) -> ApiResult<ValidatorResponse> {
    let repo = &state.repositories.validators;
    let validator = repo.find_by_node_id(node_id).await?;

    let delegations = repo
        .delegations(&DelegationSearchParams {
            node_id: Some(validator.node_id.clone()),
            reward_address: None,
        })
        .await?;
    let stats_24h = repo.stats(&validator.node_id, StatsBucket::Hour, 24).await?;
    let stats_30d = repo.stats(&validator.node_id, StatsBucket::Day, 30).await?;

    Ok(ValidatorResponse {
        validator,
        delegations,
        stats_24h,
        stats_30d,
    })
}
