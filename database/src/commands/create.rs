use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Create the database on the configured server unless it already exists
pub async fn execute(name: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    let db_name = name.unwrap_or_else(|| config.name.clone());

    if !is_valid_name(&db_name) {
        return Err(format!("Invalid database name: {}", db_name).into());
    }

    info!("Creating database: {}", db_name);

    let connection = Database::connect(config.server_url()).await.map_err(|e| {
        error!("Failed to connect to database server: {}", e);
        e
    })?;

    let exists = connection
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT 1 FROM pg_database WHERE datname = $1",
            [db_name.clone().into()],
        ))
        .await?
        .is_some();

    if exists {
        info!("Database '{}' already exists", db_name);
        return Ok(());
    }

    connection
        .execute_unprepared(&format!("CREATE DATABASE \"{}\"", db_name))
        .await
        .map_err(|e| {
            error!("Failed to create database: {}", e);
            e
        })?;

    info!("Database '{}' created successfully", db_name);
    Ok(())
}

/// Names are interpolated into DDL, so only plain identifiers pass
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers_only() {
        assert!(is_valid_name("avalanche_indexer"));
        assert!(is_valid_name("fuji-indexer"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("bad\"name"));
        assert!(!is_valid_name("drop; table"));
    }
}
