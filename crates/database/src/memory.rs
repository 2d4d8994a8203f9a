use crate::error::DbError;
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Comment, Enterprise, Event, Participant, Post, RequestContext};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    enterprises: Vec<Enterprise>,
    events: Vec<Event>,
    participants: Vec<Participant>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

/// In-memory [`Storage`] with the same observable behaviour as the
/// PostgreSQL schema: ids start at 1 per table, `created_at` is stamped on
/// insert, and foreign keys are enforced.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, ctx: &RequestContext) -> Result<RwLockReadGuard<'_, Tables>, DbError> {
        check_deadline(ctx)?;
        self.tables
            .read()
            .map_err(|_| DbError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self, ctx: &RequestContext) -> Result<RwLockWriteGuard<'_, Tables>, DbError> {
        check_deadline(ctx)?;
        self.tables
            .write()
            .map_err(|_| DbError::Unavailable("lock poisoned".to_string()))
    }
}

fn check_deadline(ctx: &RequestContext) -> Result<(), DbError> {
    if ctx.is_expired() {
        return Err(DbError::Timeout);
    }
    Ok(())
}

fn missing_parent(table: &str, column: &str, id: i64) -> DbError {
    DbError::ConstraintViolation(format!("{table}.{column} references missing row {id}"))
}

// Rows are never deleted, so the next id is always one past the row count.
fn next_id<T>(rows: &[T]) -> i64 {
    rows.len() as i64 + 1
}

#[async_trait]
impl Storage for InMemoryRepository {
    async fn ping(&self, ctx: &RequestContext) -> Result<(), DbError> {
        self.read(ctx).map(|_| ())
    }

    async fn register_enterprise(&self, ctx: &RequestContext, name: &str) -> Result<i64, DbError> {
        let mut tables = self.write(ctx)?;
        let id = next_id(&tables.enterprises);
        tables.enterprises.push(Enterprise { id, name: name.to_string() });
        Ok(id)
    }

    async fn register_event(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
        enterprise_id: i64,
    ) -> Result<i64, DbError> {
        let mut tables = self.write(ctx)?;
        if !tables.enterprises.iter().any(|e| e.id == enterprise_id) {
            return Err(missing_parent("events", "enterprise_id", enterprise_id));
        }
        let id = next_id(&tables.events);
        tables.events.push(Event {
            id,
            enterprise_id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn register_participant(
        &self,
        ctx: &RequestContext,
        event_id: i64,
        name: &str,
    ) -> Result<i64, DbError> {
        let mut tables = self.write(ctx)?;
        if !tables.events.iter().any(|e| e.id == event_id) {
            return Err(missing_parent("participants", "event_id", event_id));
        }
        let id = next_id(&tables.participants);
        tables.participants.push(Participant { id, event_id, name: name.to_string() });
        Ok(id)
    }

    async fn create_post(
        &self,
        ctx: &RequestContext,
        content: &str,
        event_id: i64,
    ) -> Result<i64, DbError> {
        let mut tables = self.write(ctx)?;
        if !tables.events.iter().any(|e| e.id == event_id) {
            return Err(missing_parent("posts", "event_id", event_id));
        }
        let id = next_id(&tables.posts);
        tables.posts.push(Post {
            id,
            event_id,
            content: content.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        participant_id: i64,
        content: &str,
    ) -> Result<i64, DbError> {
        let mut tables = self.write(ctx)?;
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(missing_parent("comments", "post_id", post_id));
        }
        if !tables.participants.iter().any(|p| p.id == participant_id) {
            return Err(missing_parent("comments", "participant_id", participant_id));
        }
        let id = next_id(&tables.comments);
        tables.comments.push(Comment {
            id,
            post_id,
            participant_id,
            content: content.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_enterprises(&self, ctx: &RequestContext) -> Result<Vec<Enterprise>, DbError> {
        Ok(self.read(ctx)?.enterprises.clone())
    }

    async fn list_events(&self, ctx: &RequestContext) -> Result<Vec<Event>, DbError> {
        Ok(self.read(ctx)?.events.clone())
    }

    async fn list_participants(&self, ctx: &RequestContext) -> Result<Vec<Participant>, DbError> {
        Ok(self.read(ctx)?.participants.clone())
    }

    async fn list_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>, DbError> {
        Ok(self.read(ctx)?.posts.clone())
    }

    async fn list_comments(&self, ctx: &RequestContext) -> Result<Vec<Comment>, DbError> {
        Ok(self.read(ctx)?.comments.clone())
    }
}
