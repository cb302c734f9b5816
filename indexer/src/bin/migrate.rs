use avalanche_indexer::config::AppConfig;
use avalanche_indexer::utils::logging;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logger();

    // DATABASE_URL from the environment or .env
    let config = AppConfig::from_env();

    logging::log_info("Running database migrations...");

    let connection = Database::connect(&config.database.url).await?;

    Migrator::up(&connection, None).await?;

    logging::log_info("Migrations completed successfully!");

    Ok(())
}
