use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

pub type EventId = i64;
pub type RegistrationId = i64;
pub type UserId = String;

/// Lifecycle of an event. Admission is only open while `Planned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Planned,
    Active,
    Finished,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planned => "PLANNED",
            EventStatus::Active => "ACTIVE",
            EventStatus::Finished => "FINISHED",
        }
    }

    pub fn is_open(&self) -> bool {
        *self == EventStatus::Planned
    }

    /// Events only ever move forward: PLANNED -> ACTIVE -> FINISHED.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        self.order() <= next.order()
    }

    fn order(&self) -> u8 {
        match self {
            EventStatus::Planned => 0,
            EventStatus::Active => 1,
            EventStatus::Finished => 2,
        }
    }
}

/// What a participant asked for. Distinct from whether they hold a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    In,
    Maybe,
    Out,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::In => "IN",
            RsvpStatus::Maybe => "MAYBE",
            RsvpStatus::Out => "OUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(EventStatus::Planned),
            "ACTIVE" => Ok(EventStatus::Active),
            "FINISHED" => Ok(EventStatus::Finished),
            other => Err(UnknownVariant { kind: "event status", value: other.to_string() }),
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(RsvpStatus::In),
            "MAYBE" => Ok(RsvpStatus::Maybe),
            "OUT" => Ok(RsvpStatus::Out),
            other => Err(UnknownVariant { kind: "registration status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for EventStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EventStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for RsvpStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RsvpStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub max_players: i64,
    pub min_players: i64,
    pub status: EventStatus,
    pub created_at: NaiveDateTime,
}

// DTO for the count-joined query
#[derive(Debug, Clone)]
pub struct EventWithCount {
    pub event: Event,
    pub confirmed_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub max_players: i64,
    pub min_players: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub max_players: Option<i64>,
    pub min_players: Option<i64>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub status: RsvpStatus,
    pub confirmed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Registration {
    pub fn is_waitlisted(&self) -> bool {
        self.status == RsvpStatus::In && !self.confirmed
    }
}
