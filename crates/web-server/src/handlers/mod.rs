//! One handler per endpoint. Every create handler runs the same four steps:
//! decode the body ([`JsonBody`](crate::extract::JsonBody)), validate it,
//! delegate to [`Storage`](database::Storage), and answer with the envelope.

use crate::error::AppError;
use core_types::RequestContext;
use database::DbError;
use std::future::Future;

mod content;
mod register;

pub use content::{create_comment, create_post, list_comments, list_posts};
pub use register::{
    list_enterprises, list_events, list_participants, register_enterprise, register_event,
    register_participant,
};

/// # GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// Runs a storage call under the request deadline, whatever the storage
/// implementation does about deadlines itself.
async fn delegate<T, F>(ctx: &RequestContext, action: &'static str, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout_at(ctx.deadline, call).await {
        Ok(result) => result.map_err(AppError::storage(action)),
        Err(_) => Err(AppError::Storage { action, source: DbError::Timeout }),
    }
}
