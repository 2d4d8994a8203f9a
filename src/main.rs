use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{load_config, Config, ConfigArgs};
use core_types::RequestContext;
use database::{DbRepository, Storage};
use web_server::Phase;

mod telemetry;

/// The main entry point for the EventHub backend.
#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments use the environment.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(&cli.config.path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let _guard = telemetry::init_tracing(&config.log);
    announce_start(&config);
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file.");
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => web_server::run_server(config).await,
        Commands::Migrate => handle_migrate(&config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = ?e, "Fatal error.");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// REST backend for enterprises, their events, participants, posts and comments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connects, migrates and serves the HTTP API until SIGINT or SIGTERM (default).
    Serve,
    /// Applies pending database migrations and exits.
    Migrate,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

/// Logs the `Starting` phase. Config loading belongs to that phase but runs
/// before a logger exists, so the phase is recorded as soon as one does.
fn announce_start(config: &Config) {
    Phase::Starting.enter();
    tracing::info!(
        env = config.log.env.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        "Starting EventHub."
    );
}

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = database::connect(&config.database)
        .await
        .context("failed to init storage")?;
    let repo = DbRepository::new(pool);
    let probe = RequestContext::new("migrate", config.database.acquire_timeout());
    repo.ping(&probe).await.context("storage is not reachable")?;
    Phase::Connected.enter();

    database::run_migrations(repo.pool())
        .await
        .context("failed to make migrations")?;
    Phase::MigrationApplied.enter();
    tracing::info!("Migrations are up to date.");
    Ok(())
}
