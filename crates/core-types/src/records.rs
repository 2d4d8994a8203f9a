use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `enterprises` table. Enterprises own events.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: i64,
    pub name: String,
}

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub enterprise_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Assigned by the store at insert time.
    pub created_at: DateTime<Utc>,
}

/// A person registered for an event. Exposed over HTTP as a "user".
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub event_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A participant's comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub participant_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
