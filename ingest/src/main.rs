use anyhow::Result;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, Config, StagingStore};
use uuid::Uuid;

mod extract;
mod load;
mod pipeline;

#[derive(Parser)]
#[command(name = "ingest", about = "Cross-market ELT pipeline: APIs -> staging -> MySQL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch crypto, oil and stock-index data into the Redis staging area
    Extract,
    /// Migrate staged documents into MySQL (cleaning + currency conversion)
    Load {
        /// Drop staged documents after a successful load
        #[arg(long)]
        clear: bool,
    },
    /// Extract then load in one shot
    Run {
        #[arg(long)]
        clear: bool,
    },
    /// Apply database schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        git_hash = env!("GIT_HASH"),
        build_time = env!("BUILD_TIME"),
        "Starting ingest"
    );

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Extract => {
            let mut store = StagingStore::connect(&config.redis_url).await?;
            let report = pipeline::extract(&config, &mut store).await?;
            tracing::info!(?report, "Extract finished");
        }
        Commands::Load { clear } => {
            let mut store = StagingStore::connect(&config.redis_url).await?;
            let db = get_db_connection(&config.database_url).await?;
            let report = pipeline::load(&config, &mut store, &db).await?;
            tracing::info!(?report, "Load finished");
            if clear {
                let removed = store.clear().await?;
                tracing::info!(removed, "Staging area cleared");
            }
        }
        Commands::Run { clear } => {
            let mut store = StagingStore::connect(&config.redis_url).await?;
            let db = get_db_connection(&config.database_url).await?;
            let extract_report = pipeline::extract(&config, &mut store).await?;
            tracing::info!(?extract_report, "Extract finished");
            let load_report = pipeline::load(&config, &mut store, &db).await?;
            tracing::info!(?load_report, "Load finished");
            if clear {
                let removed = store.clear().await?;
                tracing::info!(removed, "Staging area cleared");
            }
        }
        Commands::Migrate => {
            let db = get_db_connection(&config.database_url).await?;
            Migrator::up(&db, None).await?;
            tracing::info!("Migrations applied");
        }
    }

    Ok(())
}
