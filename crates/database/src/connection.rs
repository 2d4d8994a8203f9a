use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is created eagerly, so an unreachable server or bad credentials
/// surface here rather than on the first request. The returned pool is cheap
/// to clone and is shared by every request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Builds the connection options from either the full URL or its parts.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    match &settings.url {
        Some(url) => PgConnectOptions::from_str(url)
            .map_err(|e| DbError::ConnectionConfigError(e.to_string())),
        None => Ok(PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.db_name)
            .ssl_mode(PgSslMode::Disable)),
    }
}

/// Applies any pending migrations from `./migrations`.
///
/// Already-applied migrations are skipped, so calling this on an up-to-date
/// schema is a no-op.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
