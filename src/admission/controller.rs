use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use rusqlite::TransactionBehavior;

use super::errors::AdmissionError;
use super::ledger::RegistrationLedger;
use super::locks::EventLocks;
use super::notify::{LogNotifier, Notifier};
use super::promoter::WaitlistPromoter;
use crate::config::{AdmissionSettings, PromotionPolicy};
use crate::database::{self, events, DbConn, DbPool, Event, EventChanges, EventId, Registration, RsvpStatus};

/// Result of a single status change.
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub registration: Registration,
    pub confirmed: bool,
    pub waitlisted: bool,
    /// Registrants moved off the waitlist because this request vacated a slot.
    pub promoted: Vec<Registration>,
    /// Set when the status change committed but the follow-up promotion
    /// failed. Retry with [`AdmissionController::promote_waitlist`].
    pub promotion_error: Option<String>,
}

impl AdmissionOutcome {
    pub fn message(&self) -> &'static str {
        if self.confirmed {
            "Successfully registered!"
        } else if self.waitlisted {
            "Added to waitlist - you'll be notified if a spot opens up"
        } else {
            "Registration updated"
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventUpdate {
    pub event: Event,
    pub promoted: Vec<Registration>,
    pub promotion_error: Option<String>,
}

/// Whether a registrant holds a slot after asking for `desired`.
///
/// An already confirmed IN keeps its slot; a new IN takes one only if the
/// event is below capacity. MAYBE and OUT never hold a slot.
pub fn decide(desired: RsvpStatus, already_confirmed: bool, confirmed_count: i64, max_players: i64) -> bool {
    match desired {
        RsvpStatus::In if already_confirmed => true,
        RsvpStatus::In => confirmed_count < max_players,
        RsvpStatus::Maybe | RsvpStatus::Out => false,
    }
}

/// Serializes every capacity-affecting change for an event behind that
/// event's lock and one SQLite transaction.
#[derive(Clone)]
pub struct AdmissionController {
    pool: DbPool,
    locks: Arc<EventLocks>,
    notifier: Arc<dyn Notifier>,
    settings: AdmissionSettings,
}

impl AdmissionController {
    pub fn new(pool: DbPool, locks: Arc<EventLocks>, settings: AdmissionSettings) -> Self {
        Self {
            pool,
            locks,
            notifier: Arc::new(LogNotifier),
            settings,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn request_status(
        &self,
        event_id: EventId,
        user_id: &str,
        desired: RsvpStatus,
    ) -> Result<AdmissionOutcome, AdmissionError> {
        if user_id.trim().is_empty() {
            return Err(AdmissionError::Validation("userId is required".to_string()));
        }

        let _guard = self.locks.acquire(event_id, self.lock_timeout())?;
        let mut conn = database::get_connection(&self.pool)?;

        let (event, was_confirmed, registration) = {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let event = load_open_event(&tx, event_id)?;
            let ledger = RegistrationLedger::new(&tx);

            let was_confirmed = ledger
                .get(event_id, user_id)?
                .is_some_and(|existing| existing.confirmed);
            let confirmed = decide(
                desired,
                was_confirmed,
                ledger.confirmed_count(event_id)?,
                event.max_players,
            );
            let registration = ledger.upsert(event_id, user_id, desired, confirmed)?;

            tx.commit()?;
            (event, was_confirmed, registration)
        };

        info!(
            "Event {}: user {} -> {} (confirmed: {})",
            event_id, user_id, desired, registration.confirmed
        );

        let mut outcome = AdmissionOutcome {
            confirmed: registration.confirmed,
            waitlisted: registration.is_waitlisted(),
            registration,
            promoted: Vec::new(),
            promotion_error: None,
        };

        if was_confirmed && !outcome.confirmed {
            match self.run_promotion(&mut conn, &event, self.settings.promotion_policy) {
                Ok(promoted) => outcome.promoted = promoted,
                Err(e) => {
                    error!("Promotion after vacancy on event {} failed: {}", event_id, e);
                    outcome.promotion_error = Some(e.to_string());
                }
            }
        }

        Ok(outcome)
    }

    /// Fills every free slot from the waitlist.
    pub fn promote_waitlist(&self, event_id: EventId) -> Result<Vec<Registration>, AdmissionError> {
        let _guard = self.locks.acquire(event_id, self.lock_timeout())?;
        let mut conn = database::get_connection(&self.pool)?;

        let event = load_open_event(&conn, event_id)?;
        self.run_promotion(&mut conn, &event, PromotionPolicy::Fill)
    }

    /// Changes capacity or lifecycle status. Capacity may not drop below the
    /// number of confirmed registrants; extra capacity is filled immediately.
    pub fn update_event(&self, event_id: EventId, changes: EventChanges) -> Result<EventUpdate, AdmissionError> {
        let _guard = self.locks.acquire(event_id, self.lock_timeout())?;
        let mut conn = database::get_connection(&self.pool)?;

        let event = {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = events::find_by_id(&tx, event_id)?
                .ok_or_else(|| AdmissionError::event_not_found(event_id))?;
            let confirmed_count = RegistrationLedger::new(&tx).confirmed_count(event_id)?;

            validate_changes(&current, &changes, confirmed_count)?;
            let updated = events::apply_changes(&tx, event_id, &changes)?;

            tx.commit()?;
            updated
        };

        info!(
            "Event {} updated: status {}, capacity {}..{}",
            event.id, event.status, event.min_players, event.max_players
        );

        let mut update = EventUpdate {
            event,
            promoted: Vec::new(),
            promotion_error: None,
        };

        if update.event.status.is_open() {
            match self.run_promotion(&mut conn, &update.event, PromotionPolicy::Fill) {
                Ok(promoted) => update.promoted = promoted,
                Err(e) => {
                    error!("Promotion after update of event {} failed: {}", event_id, e);
                    update.promotion_error = Some(e.to_string());
                }
            }
        }

        Ok(update)
    }

    fn run_promotion(
        &self,
        conn: &mut DbConn,
        event: &Event,
        policy: PromotionPolicy,
    ) -> Result<Vec<Registration>, AdmissionError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let promoter = WaitlistPromoter::new(RegistrationLedger::new(&tx));

        let promoted: Vec<Registration> = match policy {
            PromotionPolicy::Single => promoter.promote(event)?.into_iter().collect(),
            PromotionPolicy::Fill => promoter.promote_all(event)?,
        };

        tx.commit()?;

        for registration in &promoted {
            self.notifier.promoted(registration);
        }
        Ok(promoted)
    }

    fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.settings.lock_timeout_ms)
    }
}

fn load_open_event(conn: &rusqlite::Connection, event_id: EventId) -> Result<Event, AdmissionError> {
    let event = events::find_by_id(conn, event_id)?
        .ok_or_else(|| AdmissionError::event_not_found(event_id))?;

    if !event.status.is_open() {
        return Err(AdmissionError::EventNotOpen {
            event_id,
            status: event.status,
        });
    }
    Ok(event)
}

fn validate_changes(current: &Event, changes: &EventChanges, confirmed_count: i64) -> Result<(), AdmissionError> {
    if let Some(next) = changes.status {
        if !current.status.can_transition_to(next) {
            return Err(AdmissionError::Validation(format!(
                "cannot move event from {} back to {}",
                current.status, next
            )));
        }
    }

    if changes.max_players.is_none() && changes.min_players.is_none() {
        return Ok(());
    }

    if !current.status.is_open() {
        return Err(AdmissionError::EventNotOpen {
            event_id: current.id,
            status: current.status,
        });
    }

    let max_players = changes.max_players.unwrap_or(current.max_players);
    let min_players = changes.min_players.unwrap_or(current.min_players);
    validate_capacity(max_players, min_players)?;

    if max_players < confirmed_count {
        return Err(AdmissionError::Validation(format!(
            "maxPlayers {} is below the {} already confirmed",
            max_players, confirmed_count
        )));
    }
    Ok(())
}

pub fn validate_capacity(max_players: i64, min_players: i64) -> Result<(), AdmissionError> {
    if max_players < 1 {
        return Err(AdmissionError::Validation("maxPlayers must be at least 1".to_string()));
    }
    if min_players < 0 || min_players > max_players {
        return Err(AdmissionError::Validation(
            "minPlayers must be between 0 and maxPlayers".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_in_takes_a_free_slot() {
        assert!(decide(RsvpStatus::In, false, 1, 2));
    }

    #[test]
    fn new_in_waits_when_full() {
        assert!(!decide(RsvpStatus::In, false, 2, 2));
    }

    #[test]
    fn confirmed_in_keeps_slot_even_when_full() {
        assert!(decide(RsvpStatus::In, true, 2, 2));
    }

    #[test]
    fn maybe_and_out_never_hold_slots() {
        assert!(!decide(RsvpStatus::Maybe, true, 0, 10));
        assert!(!decide(RsvpStatus::Out, true, 0, 10));
        assert!(!decide(RsvpStatus::Out, false, 0, 10));
    }

    #[test]
    fn capacity_bounds() {
        assert!(validate_capacity(1, 0).is_ok());
        assert!(validate_capacity(8, 8).is_ok());
        assert!(validate_capacity(0, 0).is_err());
        assert!(validate_capacity(4, 5).is_err());
        assert!(validate_capacity(4, -1).is_err());
    }

    #[test]
    fn outcome_messages() {
        let timestamp = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let registration = Registration {
            id: 1,
            event_id: 1,
            user_id: "u".to_string(),
            status: RsvpStatus::In,
            confirmed: false,
            created_at: timestamp,
            updated_at: timestamp,
        };
        let mut outcome = AdmissionOutcome {
            registration,
            confirmed: false,
            waitlisted: true,
            promoted: Vec::new(),
            promotion_error: None,
        };
        assert!(outcome.message().starts_with("Added to waitlist"));

        outcome.waitlisted = false;
        assert_eq!(outcome.message(), "Registration updated");

        outcome.confirmed = true;
        assert_eq!(outcome.message(), "Successfully registered!");
    }
}
