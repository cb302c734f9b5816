use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};
use std::collections::HashSet;

use super::payload::MetricsPayload;
use super::Stage;
use crate::domain::errors::PipelineError;
use crate::domain::models::validator::percent_of;
use crate::domain::models::{Delegation, NetworkMetric, Validator, ValidatorSeq};
use crate::infrastructure::node::types::{Delegator, Validator as NodeValidator};

/// A validator may take delegations up to this multiple of its own stake
pub const MAX_DELEGATION_FACTOR: i64 = 4;

/// Turns the fetched snapshot into validator, delegation and network records
pub struct ParseStage;

#[async_trait]
impl Stage for ParseStage {
    fn name(&self) -> &'static str {
        "parser"
    }

    async fn run(&self, payload: &mut MetricsPayload) -> Result<(), PipelineError> {
        parse_payload(payload)
    }
}

pub fn parse_payload(payload: &mut MetricsPayload) -> Result<(), PipelineError> {
    calculate_stake_shares(payload)?;

    payload.min_validator_stake =
        parse_amount("min validator stake", &payload.min_stake.min_validator_stake)?;
    payload.min_delegator_stake =
        parse_amount("min delegator stake", &payload.min_stake.min_delegator_stake)?;
    payload.tx_fee = parse_amount("tx fee", &payload.raw_tx_fee.tx_fee)?;
    payload.creation_tx_fee = parse_amount("creation tx fee", &payload.raw_tx_fee.creation_tx_fee)?;

    let delegations = parse_delegations(payload)?;
    let validators = parse_validators(payload, delegations.len())?;

    payload.validator_seqs = validators
        .iter()
        .map(|v| ValidatorSeq {
            time: payload.sync_time,
            ..ValidatorSeq::from(v)
        })
        .collect();
    payload.network_metric = Some(network_metric(payload, &validators, &delegations));
    payload.validators = validators;
    payload.delegations = delegations;
    Ok(())
}

fn calculate_stake_shares(payload: &mut MetricsPayload) -> Result<(), PipelineError> {
    let mut total: i64 = 0;
    let mut stakes = Vec::with_capacity(payload.current_validators.len());
    for v in &payload.current_validators {
        let stake = parse_amount("stake amount", &v.stake_amount)?;
        total = total.saturating_add(stake);
        stakes.push((v.node_id.clone(), stake));
    }

    payload.active_stake_amount = total;
    payload.active_validator_share = stakes
        .into_iter()
        .map(|(node_id, stake)| (node_id, percent_of(stake, total)))
        .collect();
    Ok(())
}

fn parse_validators(
    payload: &MetricsPayload,
    total_delegations: usize,
) -> Result<Vec<Validator>, PipelineError> {
    payload
        .current_validators
        .iter()
        .map(|v| parse_validator(payload, v, total_delegations))
        .collect()
}

fn parse_validator(
    payload: &MetricsPayload,
    v: &NodeValidator,
    total_delegations: usize,
) -> Result<Validator, PipelineError> {
    let stake_amount = parse_amount("stake amount", &v.stake_amount)?;
    let start = parse_unix_time("start time", &v.start_time)?;
    let end = parse_unix_time("end time", &v.end_time)?;

    let delegators = v.delegators.as_deref().unwrap_or_default();
    let mut delegated_amount: i64 = 0;
    for d in delegators {
        delegated_amount = delegated_amount.saturating_add(parse_amount("stake amount", &d.stake_amount)?);
    }

    let max_delegation = stake_amount.saturating_mul(MAX_DELEGATION_FACTOR);
    let delegations_count = delegators.len() as i64;

    Ok(Validator {
        node_id: v.node_id.clone(),
        stake_amount,
        stake_percent: payload
            .active_validator_share
            .get(&v.node_id)
            .copied()
            .unwrap_or_default(),
        potential_reward: parse_amount("potential reward", &v.potential_reward)?,
        reward_address: v.reward_address(),
        active: true,
        active_start_time: start,
        active_end_time: end,
        active_progress_percent: progress_percent(start, end, payload.sync_time),
        uptime: parse_float("uptime", &v.uptime)? * 100.0,
        delegations_count: delegations_count as i32,
        delegations_percent: percent_of(delegations_count, total_delegations as i64),
        delegated_amount,
        delegated_amount_percent: percent_of(delegated_amount, stake_amount),
        delegation_fee: parse_float("delegation fee", &v.delegation_fee)?,
        capacity: max_delegation.saturating_sub(delegated_amount),
        capacity_percent: percent_of(delegated_amount, max_delegation),
        first_height: payload.height,
        last_height: payload.height,
    })
}

fn parse_delegations(payload: &MetricsPayload) -> Result<Vec<Delegation>, PipelineError> {
    let nested = payload
        .current_validators
        .iter()
        .flat_map(|v| v.delegators.iter().flatten());

    let mut seen = HashSet::new();
    let mut delegations = Vec::new();
    for d in nested.chain(payload.current_delegators.iter()) {
        let delegation = parse_delegation(d, payload.height)?;
        if seen.insert(delegation.reference_id.clone()) {
            delegations.push(delegation);
        }
    }
    Ok(delegations)
}

fn parse_delegation(d: &Delegator, height: i64) -> Result<Delegation, PipelineError> {
    let reward_address = d.reward_address();
    Ok(Delegation {
        reference_id: delegation_reference_id(&d.node_id, &reward_address, &d.start_time, &d.end_time),
        node_id: d.node_id.clone(),
        stake_amount: parse_amount("stake amount", &d.stake_amount)?,
        potential_reward: parse_amount("potential reward", &d.potential_reward)?,
        reward_address,
        active: true,
        active_start_time: parse_unix_time("start time", &d.start_time)?,
        active_end_time: parse_unix_time("end time", &d.end_time)?,
        first_height: height,
        last_height: height,
    })
}

/// Delegations carry no id of their own on the node
pub fn delegation_reference_id(node_id: &str, reward_address: &str, start: &str, end: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{}_{}_{}_{}", node_id, reward_address, start, end).as_bytes());
    hex::encode(hasher.finalize())
}

fn network_metric(
    payload: &MetricsPayload,
    validators: &[Validator],
    delegations: &[Delegation],
) -> NetworkMetric {
    let count = validators.len();
    let (uptime, delegation_fee) = if count == 0 {
        (0.0, 0.0)
    } else {
        let uptime: f64 = validators.iter().map(|v| v.uptime).sum();
        let fee: f64 = validators.iter().map(|v| v.delegation_fee).sum();
        (uptime / count as f64, fee / count as f64)
    };

    NetworkMetric {
        time: payload.sync_time,
        height: payload.height,
        peers_count: payload.peers.len() as i32,
        blockchains_count: payload.blockchains.len() as i32,
        active_validators_count: count as i32,
        pending_validators_count: payload.pending_validators.len() as i32,
        active_delegations_count: delegations.len() as i32,
        pending_delegations_count: payload.pending_delegators.len() as i32,
        min_validator_stake: payload.min_validator_stake,
        min_delegation_stake: payload.min_delegator_stake,
        tx_fee: payload.tx_fee,
        creation_tx_fee: payload.creation_tx_fee,
        uptime,
        delegation_fee,
        total_staked: payload.active_stake_amount,
        total_delegated: validators.iter().map(|v| v.delegated_amount).sum(),
    }
}

/// Elapsed share of the staking period, clamped to 0..=100
pub fn progress_percent(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let total = (end - start).num_seconds();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (now - start).num_seconds();
    (elapsed as f64 * 100.0 / total as f64).clamp(0.0, 100.0)
}

fn parse_amount(field: &str, value: &str) -> Result<i64, PipelineError> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|e| PipelineError::ParseError(format!("invalid {} {:?}: {}", field, value, e)))
}

fn parse_float(field: &str, value: &str) -> Result<f64, PipelineError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|e| PipelineError::ParseError(format!("invalid {} {:?}: {}", field, value, e)))
}

fn parse_unix_time(field: &str, value: &str) -> Result<DateTime<Utc>, PipelineError> {
    let secs = parse_amount(field, value)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| PipelineError::ParseError(format!("{} {} out of range", field, secs)))
}
