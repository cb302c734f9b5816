use std::sync::Arc;
use std::time::Duration;

use avalanche_indexer::application::pipeline::{run_purge, MetricsPipeline, MetricsScheduler};
use avalanche_indexer::application::sync::mapper::{CChainMapper, PChainMapper, XChainMapper};
use avalanche_indexer::application::sync::{
    ContainerDecoder, ContainerFetcher, MapperContext, PersistenceWriter, SyncCursor,
};
use avalanche_indexer::application::workers::evm_worker::EvmWorkerSettings;
use avalanche_indexer::application::workers::{
    ChainWorker, EventsWorker, EvmWorker, WorkerManager, WorkerTimings,
};
use avalanche_indexer::config::AppConfig;
use avalanche_indexer::domain::models::{Asset, Chain};
use avalanche_indexer::domain::ports::TxStore;
use avalanche_indexer::infrastructure::codec::Codecs;
use avalanche_indexer::infrastructure::node::{IndexClient, NodeClient};
use avalanche_indexer::infrastructure::persistence::{DbPool, Repositories, RepositoryFactory};
use avalanche_indexer::utils::logging;

/// Subnet id of the primary network
const PRIMARY_NETWORK_ID: &str = "11111111111111111111111111111111LpoYY";

/// Blockchain ids of the three primary network chains
struct ChainIds {
    x: String,
    p: String,
    c: String,
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = AppConfig::from_env();
    logging::log_info(&format!(
        "avalanche-indexer {} starting",
        env!("CARGO_PKG_VERSION")
    ));
    logging::log_connection_details(&config.node.rpc_endpoint, config.node.network_id);

    if let Err(e) = run(config).await {
        logging::log_error(&format!("Indexer stopped with error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db_pool = DbPool::new(&config).await?;
    let repositories = RepositoryFactory::create_repositories(&db_pool);
    let node = NodeClient::new(&config.node)?;

    let ids = resolve_chains(&node).await?;
    seed(&repositories, &config, &ids).await?;

    let mut manager = WorkerManager::new(WorkerTimings::default());
    start_chain_workers(&mut manager, &config, &repositories, &node, &ids)?;
    start_derived_workers(&mut manager, &config, &repositories, &node, &ids);
    start_pipeline(&mut manager, &config, &repositories, &node);

    logging::log_info(&format!("Running: {}", manager.running().join(", ")));

    tokio::signal::ctrl_c().await?;
    logging::log_info("Shutdown requested");
    manager.stop_all().await;
    Ok(())
}

async fn resolve_chains(node: &NodeClient) -> anyhow::Result<ChainIds> {
    let ids = ChainIds {
        x: node.info.blockchain_id("X").await?,
        p: node.info.blockchain_id("P").await?,
        c: node.info.blockchain_id("C").await?,
    };
    logging::log_info(&format!("Chains: X={} P={} C={}", ids.x, ids.p, ids.c));
    Ok(ids)
}

/// Native asset and the primary network chains, inserted once
async fn seed(repositories: &Repositories, config: &AppConfig, ids: &ChainIds) -> anyhow::Result<()> {
    let store = &repositories.platform;
    store
        .create_asset(&Asset::native(config.node.native_asset_id.clone()))
        .await?;

    for (id, name, vm) in [
        (&ids.x, "X-Chain", "avm"),
        (&ids.p, "P-Chain", "platformvm"),
        (&ids.c, "C-Chain", "evm"),
    ] {
        store
            .create_chain(&Chain {
                chain_id: id.clone(),
                name: name.to_string(),
                vm: vm.to_string(),
                network: config.node.network_id,
                subnet: PRIMARY_NETWORK_ID.to_string(),
            })
            .await?;
    }
    Ok(())
}

fn start_chain_workers(
    manager: &mut WorkerManager,
    config: &AppConfig,
    repositories: &Repositories,
    node: &NodeClient,
    ids: &ChainIds,
) -> anyhow::Result<()> {
    let codecs = Codecs::new();
    let context = |chain_id: &str| {
        MapperContext::new(
            chain_id,
            config.node.network_id,
            config.node.native_asset_id.clone(),
            config.node.bech32_hrp(),
        )
    };

    if config.indexer.enable_x_worker {
        let decoder = Arc::new(XChainMapper::new(context(&ids.x)?, codecs.avm.clone()));
        manager.start_worker(chain_worker(config, repositories, &node.x_index, decoder));
    }
    if config.indexer.enable_p_worker {
        let decoder = Arc::new(PChainMapper::new(context(&ids.p)?, codecs.pvm.clone()));
        manager.start_worker(chain_worker(config, repositories, &node.p_index, decoder));
    }
    if config.indexer.enable_c_worker {
        let decoder = Arc::new(CChainMapper::new(context(&ids.c)?, codecs.atomic.clone()));
        manager.start_worker(chain_worker(config, repositories, &node.c_index, decoder));
    }
    Ok(())
}

fn chain_worker(
    config: &AppConfig,
    repositories: &Repositories,
    index: &IndexClient,
    decoder: Arc<dyn ContainerDecoder>,
) -> Box<ChainWorker> {
    Box::new(ChainWorker::new(
        ContainerFetcher::new(Arc::new(index.clone()), config.indexer.fetch_batch_size),
        decoder,
        PersistenceWriter::new(Arc::new(repositories.platform.clone())),
        SyncCursor::new(Arc::new(repositories.sync_status.clone())),
    )
    .with_tip_ttl(Duration::from_secs(config.indexer.tip_cache_ttl_secs)))
}

fn start_derived_workers(
    manager: &mut WorkerManager,
    config: &AppConfig,
    repositories: &Repositories,
    node: &NodeClient,
    ids: &ChainIds,
) {
    if config.indexer.enable_events_worker {
        manager.start_worker(Box::new(EventsWorker::new(
            ids.p.clone(),
            Arc::new(repositories.event.clone()),
            SyncCursor::new(Arc::new(repositories.sync_status.clone())),
            config.indexer.events_batch_size,
        )));
    }

    if config.indexer.enable_evm_worker {
        let settings = EvmWorkerSettings {
            page_size: config.indexer.evm_page_size,
            concurrency: config.indexer.evm_concurrency,
            tip_ttl: Duration::from_secs(config.indexer.tip_cache_ttl_secs),
        };
        manager.start_worker(Box::new(EvmWorker::new(
            ids.c.clone(),
            Arc::new(node.evm.clone()),
            Arc::new(repositories.evm.clone()),
            SyncCursor::new(Arc::new(repositories.sync_status.clone())),
            settings,
        )));
    }
}

fn start_pipeline(
    manager: &mut WorkerManager,
    config: &AppConfig,
    repositories: &Repositories,
    node: &NodeClient,
) {
    if !config.pipeline.enabled {
        logging::log_info("Metrics pipeline disabled");
        return;
    }

    let store = Arc::new(repositories.clone());
    let cancel = manager.cancel_token();
    let scheduler = MetricsScheduler::new(
        MetricsPipeline::standard(Arc::new(node.clone()), store.clone()),
        Duration::from_secs(config.pipeline.sync_interval_secs.max(1)),
    );
    manager.start_task("pipeline", scheduler.run(cancel.clone()));
    manager.start_task(
        "purge",
        run_purge(
            store,
            Duration::from_secs(config.pipeline.purge_interval_secs.max(1)),
            Duration::from_secs(config.pipeline.purge_max_age_secs),
            cancel,
        ),
    );
}
