use crate::error::DbError;
use crate::storage::Storage;
use async_trait::async_trait;
use core_types::{Comment, Enterprise, Event, Participant, Post, RequestContext};
use sqlx::postgres::PgPool;
use std::future::Future;

/// The PostgreSQL implementation of [`Storage`].
///
/// It encapsulates all SQL for the five tables. Every method runs exactly one
/// statement against the shared pool; there are no transactions.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Runs one statement, abandoning it once the request deadline has passed.
async fn bounded<T, F>(ctx: &RequestContext, op: &'static str, statement: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tracing::debug!(op, request_id = %ctx.request_id, "Running statement.");
    match tokio::time::timeout_at(ctx.deadline, statement).await {
        Ok(result) => result.map_err(DbError::classify),
        Err(_) => {
            tracing::warn!(
                op,
                request_id = %ctx.request_id,
                "Statement exceeded the request deadline."
            );
            Err(DbError::Timeout)
        }
    }
}

#[async_trait]
impl Storage for DbRepository {
    async fn ping(&self, ctx: &RequestContext) -> Result<(), DbError> {
        bounded(ctx, "database.ping", sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    async fn register_enterprise(&self, ctx: &RequestContext, name: &str) -> Result<i64, DbError> {
        bounded(
            ctx,
            "database.register_enterprise",
            sqlx::query_scalar::<_, i64>("INSERT INTO enterprises (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn register_event(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
        enterprise_id: i64,
    ) -> Result<i64, DbError> {
        bounded(
            ctx,
            "database.register_event",
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO events (name, enterprise_id, description) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(name)
            .bind(enterprise_id)
            .bind(description)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn register_participant(
        &self,
        ctx: &RequestContext,
        event_id: i64,
        name: &str,
    ) -> Result<i64, DbError> {
        bounded(
            ctx,
            "database.register_participant",
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO participants (name, event_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(name)
            .bind(event_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn create_post(
        &self,
        ctx: &RequestContext,
        content: &str,
        event_id: i64,
    ) -> Result<i64, DbError> {
        bounded(
            ctx,
            "database.create_post",
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO posts (content, event_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(content)
            .bind(event_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        participant_id: i64,
        content: &str,
    ) -> Result<i64, DbError> {
        bounded(
            ctx,
            "database.create_comment",
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO comments (post_id, participant_id, content) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(post_id)
            .bind(participant_id)
            .bind(content)
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Fetches every enterprise. There is no pagination.
    async fn list_enterprises(&self, ctx: &RequestContext) -> Result<Vec<Enterprise>, DbError> {
        bounded(
            ctx,
            "database.list_enterprises",
            sqlx::query_as::<_, Enterprise>("SELECT id, name FROM enterprises")
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_events(&self, ctx: &RequestContext) -> Result<Vec<Event>, DbError> {
        bounded(
            ctx,
            "database.list_events",
            sqlx::query_as::<_, Event>(
                "SELECT id, enterprise_id, name, description, created_at FROM events",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_participants(&self, ctx: &RequestContext) -> Result<Vec<Participant>, DbError> {
        bounded(
            ctx,
            "database.list_participants",
            sqlx::query_as::<_, Participant>("SELECT id, event_id, name FROM participants")
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>, DbError> {
        bounded(
            ctx,
            "database.list_posts",
            sqlx::query_as::<_, Post>("SELECT id, event_id, content, created_at FROM posts")
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_comments(&self, ctx: &RequestContext) -> Result<Vec<Comment>, DbError> {
        bounded(
            ctx,
            "database.list_comments",
            sqlx::query_as::<_, Comment>(
                "SELECT id, post_id, participant_id, content, created_at FROM comments",
            )
            .fetch_all(&self.pool),
        )
        .await
    }
}
