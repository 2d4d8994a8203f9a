use crate::error::DbError;
use async_trait::async_trait;
use core_types::{Comment, Enterprise, Event, Participant, Post, RequestContext};

/// The storage operations the HTTP layer depends on.
///
/// Each write runs a single insert and returns the id the store assigned; each
/// list returns every row of its table in no particular order. Implementations
/// must be safe to call from many requests at once and must give up once
/// `ctx.deadline` has passed.
///
/// Callers treat every [`DbError`] the same way: the variants exist for logs,
/// not for branching.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Checks that the store is reachable.
    async fn ping(&self, ctx: &RequestContext) -> Result<(), DbError>;

    async fn register_enterprise(&self, ctx: &RequestContext, name: &str) -> Result<i64, DbError>;

    async fn register_event(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
        enterprise_id: i64,
    ) -> Result<i64, DbError>;

    async fn register_participant(
        &self,
        ctx: &RequestContext,
        event_id: i64,
        name: &str,
    ) -> Result<i64, DbError>;

    async fn create_post(
        &self,
        ctx: &RequestContext,
        content: &str,
        event_id: i64,
    ) -> Result<i64, DbError>;

    async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        participant_id: i64,
        content: &str,
    ) -> Result<i64, DbError>;

    async fn list_enterprises(&self, ctx: &RequestContext) -> Result<Vec<Enterprise>, DbError>;

    async fn list_events(&self, ctx: &RequestContext) -> Result<Vec<Event>, DbError>;

    async fn list_participants(&self, ctx: &RequestContext) -> Result<Vec<Participant>, DbError>;

    async fn list_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>, DbError>;

    async fn list_comments(&self, ctx: &RequestContext) -> Result<Vec<Comment>, DbError>;
}
