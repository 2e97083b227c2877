//! Debounced search input.
//!
//! Each keystroke reschedules a single pending query; the query only runs
//! once the deadline passes with no newer input.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct PendingQuery {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl PendingQuery {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending text and restarts the delay from `now`.
    pub fn schedule(&mut self, text: String, now: Instant) {
        self.pending = Some((text, now + self.delay));
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Takes the pending text if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
