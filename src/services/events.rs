use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::admission::{validate_capacity, AdmissionError, EventLocks};
use crate::database::{self, events, registrations, DbPool, Event, EventId, EventWithCount, NewEvent, Registration};

/// Event bookkeeping outside the admission path: creation, reads, deletion.
#[derive(Clone)]
pub struct EventService {
    pool: DbPool,
    locks: Arc<EventLocks>,
    lock_timeout: Duration,
}

impl EventService {
    pub fn new(pool: DbPool, locks: Arc<EventLocks>, lock_timeout: Duration) -> Self {
        Self {
            pool,
            locks,
            lock_timeout,
        }
    }

    pub fn create_event(&self, new_event: &NewEvent) -> Result<Event, AdmissionError> {
        if new_event.name.trim().is_empty() {
            return Err(AdmissionError::Validation("name is required".to_string()));
        }
        validate_capacity(new_event.max_players, new_event.min_players)?;

        let conn = database::get_connection(&self.pool)?;
        let event = events::insert_event(&conn, new_event)?;
        info!("Created event {} '{}' for up to {} players", event.id, event.name, event.max_players);
        Ok(event)
    }

    pub fn list_events(&self) -> Result<Vec<EventWithCount>, AdmissionError> {
        let conn = database::get_connection(&self.pool)?;
        Ok(events::list_with_counts(&conn)?)
    }

    pub fn get_event(&self, event_id: EventId) -> Result<EventWithCount, AdmissionError> {
        let conn = database::get_connection(&self.pool)?;
        events::find_with_count(&conn, event_id)?
            .ok_or_else(|| AdmissionError::event_not_found(event_id))
    }

    /// Confirmed registrants first, then everyone else by registration time.
    pub fn list_registrations(&self, event_id: EventId) -> Result<Vec<Registration>, AdmissionError> {
        let conn = database::get_connection(&self.pool)?;
        if events::find_by_id(&conn, event_id)?.is_none() {
            return Err(AdmissionError::event_not_found(event_id));
        }
        Ok(registrations::list_for_event(&conn, event_id)?)
    }

    /// Removes the event and, through the foreign key, all its registrations.
    pub fn delete_event(&self, event_id: EventId) -> Result<(), AdmissionError> {
        let _guard = self.locks.acquire(event_id, self.lock_timeout)?;
        let conn = database::get_connection(&self.pool)?;

        if !events::delete_event(&conn, event_id)? {
            return Err(AdmissionError::event_not_found(event_id));
        }
        info!("Deleted event {}", event_id);
        Ok(())
    }
}
