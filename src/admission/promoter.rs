use anyhow::Result;
use log::debug;

use super::ledger::RegistrationLedger;
use crate::database::{Event, Registration, RsvpStatus};

/// Moves waitlisted registrants into free slots in `created_at` order.
pub struct WaitlistPromoter<'c> {
    ledger: RegistrationLedger<'c>,
}

impl<'c> WaitlistPromoter<'c> {
    pub fn new(ledger: RegistrationLedger<'c>) -> Self {
        Self { ledger }
    }

    /// Promotes at most one registrant. Returns `None` when the event is
    /// closed, full, or nobody is waiting.
    pub fn promote(&self, event: &Event) -> Result<Option<Registration>> {
        if !event.status.is_open() {
            return Ok(None);
        }

        let available = event.max_players - self.ledger.confirmed_count(event.id)?;
        if available <= 0 {
            return Ok(None);
        }

        let Some(next) = self.ledger.list_waitlisted(event.id)?.into_iter().next() else {
            debug!("Event {} has {} free spots and an empty waitlist", event.id, available);
            return Ok(None);
        };

        let promoted = self
            .ledger
            .upsert(event.id, &next.user_id, RsvpStatus::In, true)?;
        Ok(Some(promoted))
    }

    /// Repeats [`promote`](Self::promote) until capacity is reached or the
    /// waitlist runs out.
    pub fn promote_all(&self, event: &Event) -> Result<Vec<Registration>> {
        let mut promoted = Vec::new();
        while let Some(registration) = self.promote(event)? {
            promoted.push(registration);
        }
        Ok(promoted)
    }
}
