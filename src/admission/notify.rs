use log::info;

use crate::database::Registration;

/// Receives registrants who were moved off the waitlist.
pub trait Notifier: Send + Sync {
    fn promoted(&self, registration: &Registration);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn promoted(&self, registration: &Registration) {
        info!(
            "Promoted user {} from waitlist for event {}",
            registration.user_id, registration.event_id
        );
    }
}
