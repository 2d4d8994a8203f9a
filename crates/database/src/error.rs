use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("A database constraint was violated: {0}")]
    ConstraintViolation(String),

    #[error("The statement did not finish before the request deadline.")]
    Timeout,

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    /// Splits integrity failures (a missing parent row, for instance) out of
    /// the generic driver error.
    pub(crate) fn classify(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_foreign_key_violation()
                || db_err.is_unique_violation()
                || db_err.is_check_violation()
            {
                return DbError::ConstraintViolation(db_err.message().to_string());
            }
        }
        DbError::Sqlx(err)
    }
}
