use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    events::{create_event, delete_event, get_event, list_events, update_event},
    registrations::{list_registrations, promote_waitlist, set_registration_status},
    seeding::rank_phase,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:id", get(get_event).patch(update_event).delete(delete_event))
        .route("/api/events/:id/registrations", get(list_registrations))
        .route("/api/events/:id/rsvp", post(set_registration_status))
        .route("/api/events/:id/promote", post(promote_waitlist))
        .route("/api/seeding/rank", post(rank_phase))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
