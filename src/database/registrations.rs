use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{EventId, Registration, RegistrationId, RsvpStatus};

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, status, confirmed, created_at, updated_at";

pub fn find_by_key(conn: &Connection, event_id: EventId, user_id: &str) -> Result<Option<Registration>> {
    let sql = format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = ?1 AND user_id = ?2");

    conn.query_row(&sql, params![event_id, user_id], parse_registration_row)
        .optional()
        .context("Failed to query registration by event and user")
}

/// Insert-or-update keyed by `(event_id, user_id)`. `created_at` is written
/// once on insert and never touched again, so it fixes waitlist position.
pub(crate) fn upsert_registration(
    conn: &Connection,
    event_id: EventId,
    user_id: &str,
    status: RsvpStatus,
    confirmed: bool,
) -> Result<Registration> {
    if let Some(existing) = find_by_key(conn, event_id, user_id)? {
        return update_existing(conn, existing.id, status, confirmed);
    }

    insert_new_registration(conn, event_id, user_id, status, confirmed)
}

fn update_existing(
    conn: &Connection,
    id: RegistrationId,
    status: RsvpStatus,
    confirmed: bool,
) -> Result<Registration> {
    let sql = format!(
        "UPDATE registrations SET status = ?1, confirmed = ?2, updated_at = ?3 WHERE id = ?4 RETURNING {REGISTRATION_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![status, confirmed, Utc::now().naive_utc(), id],
        parse_registration_row,
    )
    .context("Failed to update registration")
}

fn insert_new_registration(
    conn: &Connection,
    event_id: EventId,
    user_id: &str,
    status: RsvpStatus,
    confirmed: bool,
) -> Result<Registration> {
    let now = Utc::now().naive_utc();
    let sql = format!(
        "INSERT INTO registrations (event_id, user_id, status, confirmed, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING {REGISTRATION_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![event_id, user_id, status, confirmed, now],
        parse_registration_row,
    )
    .context("Failed to insert new registration")
}

pub fn count_confirmed(conn: &Connection, event_id: EventId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM registrations WHERE event_id = ?1 AND status = 'IN' AND confirmed = 1",
        params![event_id],
        |row| row.get(0),
    )
    .context("Failed to count confirmed registrations")
}

/// Waitlisted registrants, oldest first. Ties on `created_at` fall back to
/// insertion order.
pub fn list_waitlisted(conn: &Connection, event_id: EventId) -> Result<Vec<Registration>> {
    let sql = format!(
        "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = ?1 AND status = 'IN' AND confirmed = 0 ORDER BY created_at ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![event_id], parse_registration_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list waitlisted registrations")?;

    Ok(rows)
}

/// Every registration for the event: confirmed first, then by registration time.
pub fn list_for_event(conn: &Connection, event_id: EventId) -> Result<Vec<Registration>> {
    let sql = format!(
        "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = ?1 ORDER BY confirmed DESC, created_at ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![event_id], parse_registration_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list registrations")?;

    Ok(rows)
}

fn parse_registration_row(row: &rusqlite::Row) -> rusqlite::Result<Registration> {
    Ok(Registration {
        id: row.get(0)?,
        event_id: row.get(1)?,
        user_id: row.get(2)?,
        status: row.get(3)?,
        confirmed: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
