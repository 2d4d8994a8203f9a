use axum::{
    response::{IntoResponse, Response},
    Json,
};
use core_types::{ApiResponse, CoreError};
use database::DbError;
use thiserror::Error;

/// Every way a request can fail once it has been routed.
///
/// The `Display` text of each variant is exactly the message the client sees
/// in the envelope's `error` field. Underlying causes stay in the `source`
/// chain, which is logged but never sent.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("empty request")]
    EmptyRequest,

    #[error("invalid request format")]
    InvalidFormat(String),

    #[error("invalid data provided")]
    InvalidData(#[from] CoreError),

    #[error("failed to {action}")]
    Storage {
        action: &'static str,
        #[source]
        source: DbError,
    },
}

impl AppError {
    /// Wraps a storage failure with the action the client asked for.
    pub fn storage(action: &'static str) -> impl FnOnce(DbError) -> AppError {
        move |source| AppError::Storage { action, source }
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Domain failures are reported inside the envelope with HTTP 200; the status
/// line is reserved for transport-level problems.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Json(ApiResponse::error(self.to_string())).into_response()
    }
}
