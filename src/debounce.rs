//! Resettable quiet-period timer.
//!
//! The debouncer does not own a task or a sleep. It only remembers the most
//! recent pending query and the instant it becomes due. The controller loop
//! sleeps until [`Debouncer::deadline`] and then calls [`Debouncer::take_ready`].

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    query: String,
    due: Instant,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending query and restart the quiet period from `now`.
    pub fn schedule(&mut self, query: String, now: Instant) {
        self.pending = Some(Pending {
            query,
            due: now + self.delay,
        });
    }

    /// Drop the pending query, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending query if its quiet period has elapsed at `now`.
    pub fn take_ready(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if p.due <= now => self.pending.take().map(|p| p.query),
            _ => None,
        }
    }
}
