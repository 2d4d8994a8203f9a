use serde::{Deserialize, Serialize};

/// Outcome marker of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Error")]
    Error,
}

/// The uniform `{status, data, error}` wrapper written by every JSON endpoint.
///
/// `data` is only present on successful reads and `error` only on failures.
/// An empty list is still `data: []`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse<()> {
    /// A success without a payload, used by the create endpoints.
    pub fn ok() -> Self {
        Self { status: Status::Ok, data: None, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: Status::Error, data: None, error: Some(message.into()) }
    }
}

impl<T> ApiResponse<T> {
    pub fn with_data(data: T) -> Self {
        Self { status: Status::Ok, data: Some(data), error: None }
    }
}
