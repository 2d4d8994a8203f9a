use std::time::Duration;
use tokio::time::Instant;

/// Per-request information created at the HTTP boundary and handed explicitly
/// to every storage call.
///
/// `request_id` correlates the handler's log lines with the statement the
/// storage layer runs. `deadline` bounds how long the storage call may take;
/// past it the call is abandoned and reported as a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub deadline: Instant,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, timeout: Duration) -> Self {
        Self { request_id: request_id.into(), deadline: Instant::now() + timeout }
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
