//! # EventHub Core Types
//!
//! The shared vocabulary of the workspace: the five domain records as they are
//! stored and returned, the request shapes the HTTP layer decodes, the uniform
//! response envelope, and the per-request context handed to the storage layer.
//!
//! As a leaf crate it knows nothing about HTTP routing or SQL; the `FromRow`
//! derives only describe how a row maps onto a record.

pub mod context;
pub mod error;
pub mod records;
pub mod requests;
pub mod response;

// Re-export the core types to provide a clean public API.
pub use context::RequestContext;
pub use error::CoreError;
pub use records::{Comment, Enterprise, Event, Participant, Post};
pub use requests::{
    CreateCommentRequest, CreateEnterpriseRequest, CreateEventRequest, CreateParticipantRequest,
    CreatePostRequest, Validate,
};
pub use response::{ApiResponse, Status};
