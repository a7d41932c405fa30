//! One-shot deadline slots.
//!
//! The pet never sleeps a thread or spawns a callback. Each component owns
//! the [`Timer`] slots it needs, and the driver asks
//! [`Pet::next_deadline`](crate::Pet::next_deadline) how long it may wait
//! before calling [`Pet::poll`](crate::Pet::poll).

use std::time::{Duration, Instant};

/// A single pending deadline, or nothing.
///
/// Arming replaces whatever was pending, so a slot can never hold two
/// firings. Cancelling an empty slot is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// An empty slot.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Fire `delay` after `now`, replacing any pending deadline.
    #[inline]
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Drop the pending deadline. Returns whether one was pending.
    #[inline]
    pub const fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether a deadline is pending.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline.
    #[inline]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The deadline, if it is due at `now`.
    #[inline]
    pub fn due(&self, now: Instant) -> Option<Instant> {
        self.deadline.filter(|at| *at <= now)
    }

    /// Consume the deadline if it is due at `now`.
    #[inline]
    pub fn take_due(&mut self, now: Instant) -> Option<Instant> {
        let at = self.due(now)?;
        self.deadline = None;
        Some(at)
    }
}
