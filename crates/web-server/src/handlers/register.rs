use super::delegate;
use crate::{
    error::AppError,
    extract::{Ctx, JsonBody},
    AppState,
};
use axum::{extract::State, Json};
use core_types::{
    ApiResponse, CreateEnterpriseRequest, CreateEventRequest, CreateParticipantRequest,
    Enterprise, Event, Participant, Validate,
};
use std::sync::Arc;

/// # POST /register/enterprise
#[tracing::instrument(
    name = "register_enterprise",
    skip_all,
    fields(op = "handlers.register.enterprise", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn register_enterprise(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<CreateEnterpriseRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    req.validate()?;
    tracing::info!(request = ?req, "Registering enterprise.");

    let id = delegate(
        &ctx,
        "register enterprise",
        state.storage.register_enterprise(&ctx, &req.name),
    )
    .await?;

    tracing::info!(id, "Enterprise registered.");
    Ok(Json(ApiResponse::ok()))
}

/// # POST /register/event
#[tracing::instrument(
    name = "register_event",
    skip_all,
    fields(op = "handlers.register.event", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn register_event(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<CreateEventRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    req.validate()?;
    tracing::info!(request = ?req, "Registering event.");

    let id = delegate(
        &ctx,
        "register event",
        state.storage.register_event(&ctx, &req.name, &req.description, req.enterprise_id),
    )
    .await?;

    tracing::info!(id, "Event registered.");
    Ok(Json(ApiResponse::ok()))
}

/// # POST /register/user
/// Registers a participant for an event.
#[tracing::instrument(
    name = "register_participant",
    skip_all,
    fields(op = "handlers.register.user", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn register_participant(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<CreateParticipantRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    req.validate()?;
    tracing::info!(request = ?req, "Registering user.");

    let id = delegate(
        &ctx,
        "register user",
        state.storage.register_participant(&ctx, req.event_id, &req.name),
    )
    .await?;

    tracing::info!(id, "User registered.");
    Ok(Json(ApiResponse::ok()))
}

/// # GET /register/enterprise
#[tracing::instrument(
    name = "list_enterprises",
    skip_all,
    fields(op = "handlers.register.enterprises", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn list_enterprises(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
) -> Result<Json<ApiResponse<Vec<Enterprise>>>, AppError> {
    tracing::info!("Getting enterprises.");
    let enterprises =
        delegate(&ctx, "get enterprises", state.storage.list_enterprises(&ctx)).await?;
    Ok(Json(ApiResponse::with_data(enterprises)))
}

/// # GET /register/event
#[tracing::instrument(
    name = "list_events",
    skip_all,
    fields(op = "handlers.register.events", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
) -> Result<Json<ApiResponse<Vec<Event>>>, AppError> {
    tracing::info!("Getting events.");
    let events = delegate(&ctx, "get events", state.storage.list_events(&ctx)).await?;
    Ok(Json(ApiResponse::with_data(events)))
}

/// # GET /register/user
#[tracing::instrument(
    name = "list_participants",
    skip_all,
    fields(op = "handlers.register.users", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
) -> Result<Json<ApiResponse<Vec<Participant>>>, AppError> {
    tracing::info!("Getting users.");
    let users = delegate(&ctx, "get users", state.storage.list_participants(&ctx)).await?;
    Ok(Json(ApiResponse::with_data(users)))
}
