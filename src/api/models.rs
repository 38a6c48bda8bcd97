use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::admission::{AdmissionOutcome, EventUpdate};
use crate::database::{Event, EventId, EventStatus, EventWithCount, Registration, RegistrationId, RsvpStatus};
use crate::seeding::{GameOutcome, ParticipantId, PhaseParticipantResult};

// --- Requests ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub status: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub max_players: i64,
    #[serde(default)]
    pub min_players: i64,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub max_players: Option<i64>,
    pub min_players: Option<i64>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[serde(default)]
    pub results: Option<Vec<PhaseParticipantResult>>,
    #[serde(default)]
    pub games: Option<Vec<GameOutcome>>,
    #[serde(default)]
    pub criteria: Option<Vec<String>>,
}

// --- Responses ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub max_players: i64,
    pub min_players: i64,
    pub status: EventStatus,
    pub created_at: NaiveDateTime,
    pub confirmed_registration_count: i64,
}

impl EventResponse {
    pub fn new(event: Event, confirmed_registration_count: i64) -> Self {
        Self {
            id: event.id,
            name: event.name,
            max_players: event.max_players,
            min_players: event.min_players,
            status: event.status,
            created_at: event.created_at,
            confirmed_registration_count,
        }
    }
}

impl From<EventWithCount> for EventResponse {
    fn from(row: EventWithCount) -> Self {
        Self::new(row.event, row.confirmed_count)
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: String,
    pub status: RsvpStatus,
    pub confirmed: bool,
    pub waitlisted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            waitlisted: registration.is_waitlisted(),
            id: registration.id,
            event_id: registration.event_id,
            user_id: registration.user_id,
            status: registration.status,
            confirmed: registration.confirmed,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpResponse {
    pub success: bool,
    pub confirmed: bool,
    pub waitlisted: bool,
    pub message: String,
    pub registration: RegistrationResponse,
    pub promoted: Vec<RegistrationResponse>,
    pub promotion_error: Option<String>,
}

impl From<AdmissionOutcome> for RsvpResponse {
    fn from(outcome: AdmissionOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message().to_string(),
            confirmed: outcome.confirmed,
            waitlisted: outcome.waitlisted,
            registration: outcome.registration.into(),
            promoted: outcome.promoted.into_iter().map(Into::into).collect(),
            promotion_error: outcome.promotion_error,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdateResponse {
    pub event: EventResponse,
    pub promoted: Vec<RegistrationResponse>,
    pub promotion_error: Option<String>,
}

impl EventUpdateResponse {
    pub fn new(update: EventUpdate, confirmed_registration_count: i64) -> Self {
        Self {
            event: EventResponse::new(update.event, confirmed_registration_count),
            promoted: update.promoted.into_iter().map(Into::into).collect(),
            promotion_error: update.promotion_error,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntry {
    pub seed: usize,
    pub participant_id: ParticipantId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub criteria: Vec<String>,
    pub seeds: Vec<SeedEntry>,
}
