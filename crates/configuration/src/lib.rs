use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AppEnv, Config, DatabaseSettings, LogSettings, ServerSettings};

/// Prefix of the environment variables that override file settings,
/// e.g. `EVENTHUB__SERVER__ADDRESS=127.0.0.1:9000`.
pub const ENV_PREFIX: &str = "EVENTHUB";

/// Command-line arguments that locate the configuration file.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file. A missing file is not an error.
    #[arg(long = "config", env = "CONFIG_PATH", default_value = "config.toml")]
    pub path: std::path::PathBuf,
}

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `EVENTHUB__*` environment variables. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    tracing::debug!(path = %path.display(), "Loading configuration.");
    let builder = with_defaults()?
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(environment());
    finish(builder)
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.address", "0.0.0.0:8080")?
        .set_default("server.timeout", 4)?
        .set_default("server.shutdown_timeout", 10)?
        .set_default("server.cors_origins", vec!["http://localhost:3000"])?
        .set_default("server.body_limit", 1024 * 1024)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.db_name", "eventhub")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout", 5)?
        .set_default("database.require_migrations", false)?
        .set_default("log.env", "dev")?;
    Ok(builder)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
        .try_parsing(true)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
