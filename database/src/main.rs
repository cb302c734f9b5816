use clap::{Parser, Subcommand};
use std::error::Error;

mod commands;
mod config;

/// Avalanche indexer database management CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if it does not exist
    Create {
        /// Database name, defaults to the one in DATABASE_URL
        name: Option<String>,
    },
    /// Apply pending migrations
    Migrate {
        /// Number of migrations to apply (all if not specified)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Drop all tables and apply every migration again
    Reset,
    /// Show applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create { name } => commands::create::execute(name).await?,
        Commands::Migrate { steps } => commands::migrate::execute(steps).await?,
        Commands::Reset => commands::migrate::reset().await?,
        Commands::Status => commands::migrate::status().await?,
    }

    Ok(())
}
