// Avalanche indexer API server entry point

mod config;
mod db;
mod entity;
mod error;
mod handlers;
mod models;
mod node;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, Router};
use http::{header, Method};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ApiConfig;
use db::DbPool;
use handlers::{addresses, assets, blocks, events, status, transactions, validators};
use handlers::{ApiState, AppState};
use node::NodeClient;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_BODY_BYTES: usize = 64 * 1024;

fn load_env() {
    dotenv::dotenv().ok();
}

/// Tracing, body limit, timeout and CORS around every route.
/// The body limit sits outside the timeout, whose inner body must be `Default`.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Configure CORS policy
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(3600));

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .layer(cors),
    )
}

fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(status::index))
        .route("/health", get(status::health_check))
        .route("/status", get(status::get_status))
        .route("/chain_sync_statuses", get(status::get_sync_statuses))
        .route("/network_stats", get(validators::get_network_stats))
        .route("/validators", get(validators::get_validators))
        .route("/validators/{id}", get(validators::get_validator))
        .route("/delegations", get(validators::get_delegations))
        .route("/address/{id}", get(addresses::get_address))
        .route(
            "/transactions",
            get(transactions::get_transactions).post(transactions::search_transactions),
        )
        .route("/transactions/{id}", get(transactions::get_transaction))
        .route(
            "/transactions/{id}/trace",
            get(transactions::get_transaction_trace),
        )
        .route(
            "/transaction_outputs/{id}",
            get(transactions::get_transaction_output),
        )
        .route("/transaction_types", get(transactions::get_transaction_types))
        .route("/chains", get(assets::get_chains))
        .route("/assets", get(assets::get_assets))
        .route("/assets/{id}", get(assets::get_asset))
        .route("/blocks", get(blocks::get_blocks))
        .route("/blocks/{id}", get(blocks::get_block))
        .route("/events", get(events::get_events))
        .route("/events/{id}", get(events::get_event));
    with_middleware(routes).with_state(state)
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("API server failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load API configuration from environment
    let config = ApiConfig::from_env();
    tracing::info!("Configuration loaded");

    // Establish database connection pool
    let db_pool = DbPool::new(&config).await?;
    tracing::info!("Connected to database");

    let node = NodeClient::new(&config)?;
    tracing::info!("Using node at {}", config.rpc_endpoint);

    let state = Arc::new(ApiState {
        repositories: db_pool.repositories(),
        node,
    });
    let app = router(state);

    // Parse server address from config
    let addr: SocketAddr = config.server_addr().parse()?;

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::post;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    fn echo() -> Router {
        with_middleware(Router::new().route("/", post(|body: String| async move { body })))
    }

    fn upload(size: usize) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from(vec![b'a'; size]))
            .unwrap()
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let response = echo().oneshot(upload(MAX_BODY_BYTES + 1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn bodies_within_the_limit_pass_through() {
        let response = echo().oneshot(upload(16)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
