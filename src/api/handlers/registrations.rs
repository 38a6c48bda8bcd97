use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use super::{run_blocking, AppState};
use crate::api::error::ApiError;
use crate::api::extract::{require_role, JsonBody, PathParam};
use crate::api::models::{RegistrationResponse, RsvpRequest, RsvpResponse};
use crate::auth::{Caller, UserRole};
use crate::database::{EventId, RsvpStatus};

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let service = state.events.clone();
    let rows = run_blocking(move || service.list_registrations(event_id)).await?;
    Ok(Json(rows.into_iter().map(RegistrationResponse::from).collect()))
}

pub async fn set_registration_status(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
    caller: Caller,
    JsonBody(body): JsonBody<RsvpRequest>,
) -> Result<Json<RsvpResponse>, ApiError> {
    let status = parse_status(body.status.as_deref())?;
    let user_id = resolve_user(&caller, body.user_id)?;

    let admission = state.admission.clone();
    let outcome = run_blocking(move || admission.request_status(event_id, &user_id, status)).await?;

    Ok(Json(outcome.into()))
}

pub async fn promote_waitlist(
    State(state): State<Arc<AppState>>,
    PathParam(event_id): PathParam<EventId>,
    caller: Caller,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    require_role(&caller, UserRole::Organizer)?;

    let admission = state.admission.clone();
    let promoted = run_blocking(move || admission.promote_waitlist(event_id)).await?;
    Ok(Json(promoted.into_iter().map(RegistrationResponse::from).collect()))
}

fn parse_status(raw: Option<&str>) -> Result<RsvpStatus, ApiError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("Valid status is required (IN, MAYBE, OUT)".to_string()))
}

/// The body may name a user; acting for someone other than yourself needs
/// organizer rights.
fn resolve_user(caller: &Caller, requested: Option<String>) -> Result<String, ApiError> {
    let requested = requested.filter(|id| !id.trim().is_empty());

    match (requested, caller.user_id.as_ref()) {
        (Some(requested), Some(own)) if &requested == own => Ok(requested),
        // Includes callers with no identity at all.
        (Some(requested), _) => {
            require_role(caller, UserRole::Organizer)?;
            Ok(requested)
        }
        (None, Some(own)) => Ok(own.clone()),
        (None, None) => Err(ApiError::BadRequest("userId is required".to_string())),
    }
}
