//! Idle/Sleep Scheduler.
//!
//! Owns the sleep flag and the two timers that lead into sleep: the idle
//! timer (time without interaction before the pet dozes off) and the
//! settle timer (short pause after Idle starts rendering before the idle
//! timer is armed). [`IdleScheduler::rearm`] and [`IdleScheduler::cancel`]
//! are the only paths that touch the idle timer.

use super::timer::Timer;
use log::debug;
use std::time::{Duration, Instant};

/// Which scheduler timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchedulerFire {
    /// Idle timer: start sleep onset.
    Idle,
    /// Settle delay elapsed: check Idle is showing, then arm.
    Settled,
}

/// Sleep flag plus the idle and settle timers.
#[derive(Debug)]
pub struct IdleScheduler {
    delay: Duration,
    settle: Duration,
    sleeping: bool,
    idle: Timer,
    settle_timer: Timer,
}

impl IdleScheduler {
    /// Awake, nothing armed.
    pub const fn new(delay: Duration, settle: Duration) -> Self {
        Self {
            delay,
            settle,
            sleeping: false,
            idle: Timer::new(),
            settle_timer: Timer::new(),
        }
    }

    /// Whether the pet is asleep.
    #[inline]
    pub const fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Pending idle deadline.
    #[inline]
    pub const fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }

    /// Cancel, then arm `delay` from `now` unless asleep.
    pub fn rearm(&mut self, now: Instant) {
        self.idle.cancel();
        if self.sleeping {
            debug!("scheduler: asleep, idle timer stays disarmed");
            return;
        }
        self.idle.arm(now, self.delay);
    }

    /// Drop the pending idle timer. Idempotent.
    pub fn cancel(&mut self) {
        if self.idle.cancel() {
            debug!("scheduler: idle timer cancelled");
        }
    }

    /// Drop both timers (theme swap).
    pub(crate) fn cancel_all(&mut self) {
        self.cancel();
        self.settle_timer.cancel();
    }

    pub(crate) fn begin_settle(&mut self, now: Instant) {
        self.settle_timer.arm(now, self.settle);
    }

    pub(crate) const fn enter_sleep(&mut self) {
        self.sleeping = true;
    }

    pub(crate) const fn leave_sleep(&mut self) {
        self.sleeping = false;
    }

    /// Earliest pending scheduler deadline.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        [self.idle.deadline(), self.settle_timer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Consume the earliest due timer, with its deadline.
    pub(crate) fn take_due(&mut self, now: Instant) -> Option<(Instant, SchedulerFire)> {
        match (self.idle.due(now), self.settle_timer.due(now)) {
            (Some(idle), Some(settle)) if settle < idle => {
                self.settle_timer.cancel();
                Some((settle, SchedulerFire::Settled))
            }
            (Some(idle), _) => {
                self.idle.cancel();
                Some((idle, SchedulerFire::Idle))
            }
            (None, Some(settle)) => {
                self.settle_timer.cancel();
                Some((settle, SchedulerFire::Settled))
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rearm_restarts_delay() {
        let t0 = Instant::now();
        let mut sched = IdleScheduler::new(ms(10_000), ms(500));
        sched.rearm(t0);
        sched.rearm(t0 + ms(5_000));

        assert!(sched.take_due(t0 + ms(10_000)).is_none());
        assert_eq!(sched.take_due(t0 + ms(15_000)), Some((t0 + ms(15_000), SchedulerFire::Idle)));
        assert!(sched.take_due(t0 + ms(30_000)).is_none());
    }

    #[test]
    fn test_rearm_while_sleeping_disarms() {
        let t0 = Instant::now();
        let mut sched = IdleScheduler::new(ms(10_000), ms(500));
        sched.rearm(t0);
        sched.enter_sleep();
        sched.rearm(t0 + ms(1));
        assert!(sched.idle_deadline().is_none());
        assert!(sched.next_deadline().is_none());
    }

    #[test]
    fn test_settle_fires_first() {
        let t0 = Instant::now();
        let mut sched = IdleScheduler::new(ms(1_000), ms(500));
        sched.rearm(t0);
        sched.begin_settle(t0);

        let late = t0 + ms(5_000);
        assert_eq!(sched.take_due(late), Some((t0 + ms(500), SchedulerFire::Settled)));
        assert_eq!(sched.take_due(late), Some((t0 + ms(1_000), SchedulerFire::Idle)));
        assert!(sched.take_due(late).is_none());
    }

    #[test]
    fn test_cancel_all() {
        let t0 = Instant::now();
        let mut sched = IdleScheduler::new(ms(1_000), ms(500));
        sched.rearm(t0);
        sched.begin_settle(t0);
        sched.cancel_all();
        sched.cancel();
        assert!(sched.next_deadline().is_none());
    }
}
