//! Request extractors shared by the handlers.

use crate::{error::AppError, AppState};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
};
use core_types::RequestContext;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The correlation id of a request, as set by the request-id middleware.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Builds the [`RequestContext`] for a request: its correlation id and the
/// deadline for storage work, counted from the moment the handler starts.
pub struct Ctx(pub RequestContext);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Ctx {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::new(request_id(&parts.headers), state.request_timeout);
        Ok(Ctx(ctx))
    }
}

/// A JSON body that tells an empty body apart from a malformed one.
///
/// The `Content-Type` header is not checked.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request_id(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::error!(%request_id, error = %rejection, "Failed to read request body.");
            AppError::InvalidFormat(rejection.body_text())
        })?;

        decode(&bytes).map(JsonBody).map_err(|err| {
            tracing::error!(%request_id, error = ?err, "Failed to decode request body.");
            err
        })
    }
}

/// Decodes a request body. Whitespace-only counts as empty.
///
/// Only the first JSON value is read and anything after it is ignored. A
/// literal `null` decodes to the zero-value request, which validation rejects.
pub fn decode<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::EmptyRequest);
    }
    match serde_json::Deserializer::from_slice(body).into_iter::<Option<T>>().next() {
        Some(Ok(value)) => Ok(value.unwrap_or_default()),
        Some(Err(e)) => Err(AppError::InvalidFormat(e.to_string())),
        None => Err(AppError::EmptyRequest),
    }
}
