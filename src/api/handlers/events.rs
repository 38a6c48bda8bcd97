use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::{run_blocking, AppState};
use crate::api::error::ApiError;
use crate::api::extract::{require_role, JsonBody, PathParam};
use crate::api::models::{CreateEventRequest, EventResponse, EventUpdateResponse, UpdateEventRequest};
use crate::auth::{Caller, UserRole};
use crate::database::{EventChanges, EventId, EventStatus, NewEvent};

pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let service = state.events.clone();
    let rows = run_blocking(move || service.list_events()).await?;
    Ok(Json(rows.into_iter().map(EventResponse::from).collect()))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
) -> Result<Json<EventResponse>, ApiError> {
    let service = state.events.clone();
    let row = run_blocking(move || service.get_event(event_id)).await?;
    Ok(Json(row.into()))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    JsonBody(body): JsonBody<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    require_role(&caller, UserRole::Organizer)?;

    let new_event = NewEvent {
        name: body.name.trim().to_string(),
        max_players: body.max_players,
        min_players: body.min_players,
    };
    let service = state.events.clone();
    let event = run_blocking(move || service.create_event(&new_event)).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::new(event, 0))))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
    caller: Caller,
    JsonBody(body): JsonBody<UpdateEventRequest>,
) -> Result<Json<EventUpdateResponse>, ApiError> {
    require_role(&caller, UserRole::Organizer)?;

    let status = body
        .status
        .as_deref()
        .map(str::parse::<EventStatus>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let changes = EventChanges {
        max_players: body.max_players,
        min_players: body.min_players,
        status,
    };

    let admission = state.admission.clone();
    let service = state.events.clone();
    let (update, count) = run_blocking(move || {
        let update = admission.update_event(event_id, changes)?;
        let count = service.get_event(event_id)?.confirmed_count;
        Ok((update, count))
    })
    .await?;

    Ok(Json(EventUpdateResponse::new(update, count)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
    caller: Caller,
) -> Result<StatusCode, ApiError> {
    require_role(&caller, UserRole::Organizer)?;

    let service = state.events.clone();
    run_blocking(move || service.delete_event(event_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
