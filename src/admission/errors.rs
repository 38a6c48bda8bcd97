use rusqlite::ErrorCode;
use thiserror::Error;

use crate::database::{EventId, EventStatus};

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("event {event_id} is {status}; registration is only open while PLANNED")]
    EventNotOpen { event_id: EventId, status: EventStatus },

    /// Lock or transaction contention. Retrying the whole request is safe.
    #[error("concurrent update conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl AdmissionError {
    pub fn event_not_found(event_id: EventId) -> Self {
        AdmissionError::NotFound(format!("event {}", event_id))
    }
}

impl From<rusqlite::Error> for AdmissionError {
    fn from(err: rusqlite::Error) -> Self {
        if is_contention(&err) {
            AdmissionError::ConcurrencyConflict(err.to_string())
        } else {
            AdmissionError::Storage(err.into())
        }
    }
}

impl From<anyhow::Error> for AdmissionError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<rusqlite::Error>() {
            Some(sqlite) if is_contention(sqlite) => {
                AdmissionError::ConcurrencyConflict(format!("{:#}", err))
            }
            _ => AdmissionError::Storage(err),
        }
    }
}

fn is_contention(err: &rusqlite::Error) -> bool {
    if let Some(inner) = err.sqlite_error() {
        if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return true;
        }
    }
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}
