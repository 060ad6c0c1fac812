mod ingest;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelfsync_core::{load_store_catalog, AppConfig, IdentityResolver, StoreCatalog};
use shelfsync_db::PgProductStore;
use shelfsync_pipeline::{PipelineConfig, UpsertPipeline};

#[derive(Debug, Parser)]
#[command(name = "shelfsync")]
#[command(about = "Load scraped store products into the product table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Upsert scraped product batches; each JSON file holds one batch
    Ingest {
        /// JSON files, or directories of JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Resolve and reconcile against stored records without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = shelfsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = shelfsync_db::PoolConfig::from_app_config(&config);
    let pool = shelfsync_db::connect_pool(&config.database_url, pool_config).await?;
    shelfsync_db::health_check(&pool).await?;
    tracing::info!(env = ?config.env, "database connection verified");

    match cli.command {
        Commands::Migrate => {
            let applied = shelfsync_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Ingest { paths, dry_run } => {
            let store = PgProductStore::new(pool, &config.products_table)?;
            let pipeline = build_pipeline(&config, Arc::new(store))?;
            ingest::run_ingest(&pipeline, &paths, dry_run).await?;
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &AppConfig,
    store: Arc<dyn shelfsync_db::ProductStore>,
) -> anyhow::Result<UpsertPipeline> {
    let catalog = match &config.stores_path {
        Some(path) => load_store_catalog(path)?,
        None => StoreCatalog::builtin(),
    };
    let stores = catalog.stores.len();
    let resolver = IdentityResolver::new(catalog, config.unknown_store_policy);
    tracing::info!(
        stores,
        policy = %resolver.policy(),
        table = %config.products_table,
        "pipeline configured"
    );

    Ok(UpsertPipeline::new(
        resolver,
        PipelineConfig::from_app_config(config),
        store,
    ))
}
