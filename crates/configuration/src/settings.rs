use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

impl Config {
    /// Rejects settings that would only fail later, at bind or connect time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.server.timeout == 0 {
            return Err(ConfigError::ValidationError(
                "server.timeout must be at least one second".to_string(),
            ));
        }
        if self.server.shutdown_timeout == 0 {
            return Err(ConfigError::ValidationError(
                "server.shutdown_timeout must be at least one second".to_string(),
            ));
        }
        if self.database.url.is_none() && self.database.db_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.db_name must be set when database.url is absent".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The `host:port` the listener binds to.
    pub address: String,
    /// Upper bound, in seconds, for the storage work of a single request.
    pub timeout: u64,
    /// How long, in seconds, in-flight requests may run after a shutdown signal.
    pub shutdown_timeout: u64,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address.parse().map_err(|e| {
            let reason = format!("server.address {:?} is invalid: {e}", self.address);
            ConfigError::ValidationError(reason)
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

/// PostgreSQL connection settings.
///
/// Either `url` is given, or the connection is assembled from the individual
/// parts. The parts are ignored when `url` is present.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before giving up.
    pub acquire_timeout: u64,
    /// Abort startup when pending migrations fail to apply.
    pub require_migrations: bool,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }
}

// Hand-written so credentials never end up in logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("require_migrations", &self.require_migrations)
            .finish()
    }
}

/// Deployment flavour, which picks the default log level.
///
/// Read from a plain string so any name is accepted; names other than `dev`
/// and `prod` log like `prod`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AppEnv {
    Dev,
    Prod,
    Other(String),
}

impl From<String> for AppEnv {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dev" => AppEnv::Dev,
            "prod" => AppEnv::Prod,
            _ => AppEnv::Other(name),
        }
    }
}

impl AppEnv {
    pub fn as_str(&self) -> &str {
        match self {
            AppEnv::Dev => "dev",
            AppEnv::Prod => "prod",
            AppEnv::Other(name) => name,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub env: AppEnv,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl LogSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_level(&self) -> &'static str {
        match self.env {
            AppEnv::Dev => "debug",
            AppEnv::Prod | AppEnv::Other(_) => "info",
        }
    }
}
