//! Request bodies accepted by the create endpoints.
//!
//! Every field defaults to its zero value when missing from the JSON body, so
//! an incomplete request decodes successfully and is then rejected by
//! [`Validate::validate`] instead of by the decoder.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Presence and positivity checks for a decoded request.
///
/// No format or length rules are applied: a string only has to be non-empty
/// and a referenced id only has to be greater than zero.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::empty(field));
    }
    Ok(())
}

fn require_id(field: &str, value: i64) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::not_positive(field));
    }
    Ok(())
}

/// `POST /register/enterprise`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEnterpriseRequest {
    pub name: String,
}

impl Validate for CreateEnterpriseRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)
    }
}

/// `POST /register/event`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub enterprise_id: i64,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_id("enterprise_id", self.enterprise_id)
    }
}

/// `POST /register/user`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateParticipantRequest {
    pub event_id: i64,
    pub name: String,
}

impl Validate for CreateParticipantRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_id("event_id", self.event_id)
    }
}

/// `POST /api/posts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub content: String,
    pub event_id: i64,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("content", &self.content)?;
        require_id("event_id", self.event_id)
    }
}

/// `POST /api/comments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub post_id: i64,
    pub participant_id: i64,
    pub content: String,
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("content", &self.content)?;
        require_id("post_id", self.post_id)?;
        require_id("participant_id", self.participant_id)
    }
}
