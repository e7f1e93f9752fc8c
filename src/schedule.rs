//! Timer primitives driven by the UI tick.
//!
//! Nothing here spawns or sleeps. Callers pass the current instant, which
//! keeps every deadline testable without a runtime clock.

use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Debouncer
// ============================================================================

/// Holds one pending value until `delay` has passed since it was scheduled.
///
/// Scheduling again replaces the value and restarts the delay.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// ============================================================================
// Transient
// ============================================================================

/// A flag that switches itself off `duration` after it was triggered.
#[derive(Debug)]
pub struct Transient {
    duration: Duration,
    until: Option<Instant>,
}

impl Transient {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    /// Set (or re-set) the flag; the deadline restarts from `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + self.duration);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear a lapsed flag. Returns true exactly once per trigger, on the
    /// first call after the deadline.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}
