use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kondate::AppState;
use kondate::routes::router;
use kondate::solver::HttpSolver;
use kondate_recipe::{CatalogSource, FileCatalog};
use tower_http::trace::TraceLayer;

/// kondate - School lunch menu planning
#[derive(Parser)]
#[command(name = "kondate")]
#[command(about = "Menu calendar assembly for school lunch planning", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load the recipe catalog and report what it contains
    CheckCatalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = kondate::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    kondate::observability::init_observability(&config.logging)?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::CheckCatalog => check_catalog_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: kondate::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting kondate server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let solver = HttpSolver::new(&config.solver)?;
    let catalog = FileCatalog::new(&config.catalog.path);

    let state = AppState::new(config, Arc::new(solver), Arc::new(catalog));
    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn check_catalog_command(config: kondate::config::Config) -> Result<()> {
    tracing::info!("Checking recipe catalog: {}", config.catalog.path);

    let catalog = FileCatalog::new(&config.catalog.path).load().await?;

    tracing::info!(
        total = catalog.len(),
        active = catalog.active_len(),
        "Catalog loaded successfully"
    );

    Ok(())
}
