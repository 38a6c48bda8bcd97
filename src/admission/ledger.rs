use anyhow::Result;
use rusqlite::Connection;

use crate::database::{registrations, EventId, Registration, RsvpStatus};

/// View of one connection's registration rows, scoped to whatever
/// transaction the connection is in.
///
/// `upsert` is the only write; admission and promotion both go through it.
#[derive(Clone, Copy)]
pub struct RegistrationLedger<'c> {
    conn: &'c Connection,
}

impl<'c> RegistrationLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, event_id: EventId, user_id: &str) -> Result<Option<Registration>> {
        registrations::find_by_key(self.conn, event_id, user_id)
    }

    pub fn upsert(
        &self,
        event_id: EventId,
        user_id: &str,
        status: RsvpStatus,
        confirmed: bool,
    ) -> Result<Registration> {
        debug_assert!(!confirmed || status == RsvpStatus::In);
        registrations::upsert_registration(self.conn, event_id, user_id, status, confirmed)
    }

    pub fn confirmed_count(&self, event_id: EventId) -> Result<i64> {
        registrations::count_confirmed(self.conn, event_id)
    }

    /// Fresh query on every call, oldest registration first.
    pub fn list_waitlisted(&self, event_id: EventId) -> Result<Vec<Registration>> {
        registrations::list_waitlisted(self.conn, event_id)
    }
}
