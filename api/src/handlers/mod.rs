// Handlers Module
// This module contains the API endpoint handlers

pub mod addresses;
pub mod assets;
pub mod blocks;
pub mod events;
pub mod status;
pub mod transactions;
pub mod validators;

use std::sync::Arc;

use crate::db::Repositories;
use crate::models::EndpointInfo;
use crate::node::NodeClient;

/// Shared state handed to every handler
pub struct ApiState {
    pub repositories: Repositories,
    pub node: NodeClient,
}

pub type AppState = Arc<ApiState>;

const fn endpoint(
    method: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointInfo {
    EndpointInfo {
        method,
        path,
        description,
    }
}

/// Listing served at `/`
pub const ENDPOINTS: &[EndpointInfo] = &[
    endpoint("GET", "/", "List all endpoints"),
    endpoint("GET", "/health", "Healthcheck"),
    endpoint("GET", "/status", "Indexer status"),
    endpoint("GET", "/chain_sync_statuses", "Chain sync statuses"),
    endpoint("GET", "/network_stats", "Network stats"),
    endpoint("GET", "/validators", "List of validators"),
    endpoint("GET", "/validators/{id}", "Validator details"),
    endpoint("GET", "/delegations", "List of delegations"),
    endpoint("GET", "/address/{id}", "Account details"),
    endpoint("GET", "/transactions", "Transactions search"),
    endpoint("POST", "/transactions", "Transactions search"),
    endpoint("GET", "/transactions/{id}", "Transaction details"),
    endpoint("GET", "/transactions/{id}/trace", "Transaction trace details"),
    endpoint("GET", "/transaction_outputs/{id}", "Transaction output details"),
    endpoint("GET", "/transaction_types", "Transaction types"),
    endpoint("GET", "/chains", "List of blockchains"),
    endpoint("GET", "/assets", "List of assets"),
    endpoint("GET", "/assets/{id}", "Asset details"),
    endpoint("GET", "/blocks", "List of blocks"),
    endpoint("GET", "/blocks/{id}", "Block details"),
    endpoint("GET", "/events", "List of events"),
    endpoint("GET", "/events/{id}", "Event details"),
];
