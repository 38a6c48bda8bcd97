use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

use super::errors::AdmissionError;
use crate::database::EventId;

/// One mutex per event. Admission work for an event is serialized; work for
/// different events never waits on each other.
#[derive(Default)]
pub struct EventLocks {
    slots: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, event_id: EventId, timeout: Duration) -> Result<EventLockGuard<'_>, AdmissionError> {
        let slot = self.slot_for(event_id);

        match slot.try_lock_arc_for(timeout) {
            Some(guard) => Ok(EventLockGuard {
                locks: self,
                event_id,
                guard: Some(guard),
            }),
            None => {
                log::warn!("Timed out waiting for admission lock on event {}", event_id);
                drop(slot);
                self.prune(event_id);
                Err(AdmissionError::ConcurrencyConflict(format!(
                    "event {} is busy, try again",
                    event_id
                )))
            }
        }
    }

    /// Number of events that currently have a lock holder or waiter.
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots.lock().len()
    }

    fn slot_for(&self, event_id: EventId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock();
        slots.entry(event_id).or_default().clone()
    }

    fn prune(&self, event_id: EventId) {
        let mut slots = self.slots.lock();
        if slots.get(&event_id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&event_id);
        }
    }
}

pub struct EventLockGuard<'a> {
    locks: &'a EventLocks,
    event_id: EventId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for EventLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the slot's only remaining owner may be the map.
        drop(self.guard.take());
        self.locks.prune(self.event_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn same_event_is_exclusive() {
        let locks = Arc::new(EventLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    let _guard = locks.acquire(7, WAIT).unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn different_events_do_not_block() {
        let locks = EventLocks::new();
        let _first = locks.acquire(1, WAIT).unwrap();
        let second = locks.acquire(2, Duration::from_millis(10));
        assert!(second.is_ok());
        assert_eq!(locks.tracked(), 2);
    }

    #[test]
    fn contended_event_times_out_as_conflict() {
        let locks = EventLocks::new();
        let _held = locks.acquire(3, WAIT).unwrap();
        let err = locks.acquire(3, Duration::from_millis(10)).err().unwrap();
        assert!(matches!(err, AdmissionError::ConcurrencyConflict(_)));
        assert_eq!(locks.tracked(), 1);
    }

    #[test]
    fn released_slots_are_forgotten() {
        let locks = EventLocks::new();
        {
            let _guard = locks.acquire(9, WAIT).unwrap();
            assert_eq!(locks.tracked(), 1);
        }
        assert_eq!(locks.tracked(), 0);
    }
}
