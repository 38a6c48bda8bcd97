use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Event, EventChanges, EventId, EventWithCount, NewEvent};

const EVENT_COLUMNS: &str = "id, name, max_players, min_players, status, created_at";

const CONFIRMED_COUNT: &str =
    "(SELECT COUNT(*) FROM registrations r WHERE r.event_id = events.id AND r.status = 'IN' AND r.confirmed = 1)";

pub fn insert_event(conn: &Connection, new_event: &NewEvent) -> Result<Event> {
    let sql = format!(
        "INSERT INTO events (name, max_players, min_players, status, created_at) VALUES (?1, ?2, ?3, 'PLANNED', ?4) RETURNING {EVENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            new_event.name,
            new_event.max_players,
            new_event.min_players,
            Utc::now().naive_utc()
        ],
        parse_event_row,
    )
    .context("Failed to insert event")
}

pub fn find_by_id(conn: &Connection, id: EventId) -> Result<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_event_row)
        .optional()
        .context("Failed to query event by id")
}

pub fn find_with_count(conn: &Connection, id: EventId) -> Result<Option<EventWithCount>> {
    let sql = format!("SELECT {EVENT_COLUMNS}, {CONFIRMED_COUNT} FROM events WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_event_with_count_row)
        .optional()
        .context("Failed to query event with confirmed count")
}

pub fn list_with_counts(conn: &Connection) -> Result<Vec<EventWithCount>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS}, {CONFIRMED_COUNT} FROM events ORDER BY created_at DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_event_with_count_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list events")?;

    Ok(rows)
}

/// Writes whichever fields are set; unset fields keep their stored value.
pub fn apply_changes(conn: &Connection, id: EventId, changes: &EventChanges) -> Result<Event> {
    let sql = format!(
        "UPDATE events SET max_players = COALESCE(?1, max_players), min_players = COALESCE(?2, min_players), status = COALESCE(?3, status) WHERE id = ?4 RETURNING {EVENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![changes.max_players, changes.min_players, changes.status, id],
        parse_event_row,
    )
    .context("Failed to update event")
}

pub fn delete_event(conn: &Connection, id: EventId) -> Result<bool> {
    let affected = conn
        .execute("DELETE FROM events WHERE id = ?1", params![id])
        .context("Failed to delete event")?;
    Ok(affected > 0)
}

fn parse_event_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        max_players: row.get(2)?,
        min_players: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn parse_event_with_count_row(row: &rusqlite::Row) -> rusqlite::Result<EventWithCount> {
    Ok(EventWithCount {
        event: parse_event_row(row)?,
        confirmed_count: row.get(6)?,
    })
}
