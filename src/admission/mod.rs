//! Capacity-bounded admission: who holds a slot, who waits, and who moves
//! up when a slot frees.

pub mod controller;
pub mod errors;
pub mod ledger;
pub mod locks;
pub mod notify;
pub mod promoter;

pub use controller::{decide, validate_capacity, AdmissionController, AdmissionOutcome, EventUpdate};
pub use errors::AdmissionError;
pub use ledger::RegistrationLedger;
pub use locks::EventLocks;
pub use notify::{LogNotifier, Notifier};
pub use promoter::WaitlistPromoter;
