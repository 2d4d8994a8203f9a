use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    pub(crate) fn empty(field: &str) -> Self {
        CoreError::InvalidInput(field.to_string(), "must not be empty".to_string())
    }

    pub(crate) fn not_positive(field: &str) -> Self {
        CoreError::InvalidInput(field.to_string(), "must be greater than zero".to_string())
    }
}
