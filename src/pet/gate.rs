//! Interaction Gate: turns raw input into intents.
//!
//! Taps are collected into bursts by a debounce timer, a held press becomes
//! a nuzzle after a threshold, and feed/wake resolve immediately. Every
//! input is checked against the pet's lock and sleep flag when it arrives,
//! and timer-resolved intents are checked again when the timer fires.

use super::timer::Timer;
use crate::clip::ClipName;
use log::debug;
use std::fmt;
use std::time::{Duration, Instant};

/// Taps in one burst above which the pet rages instead of roaring.
const RAGE_ABOVE: u32 = 2;

/// A resolved request for a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// One or two taps.
    Roar,
    /// Three or more taps in a burst.
    Rage,
    /// A held press.
    Nuzzle,
    /// Feeding.
    Eat,
    /// Waking from sleep.
    Wake,
}

impl Intent {
    /// Clip that plays for this intent.
    pub const fn clip(self) -> ClipName {
        match self {
            Self::Roar => ClipName::Roar,
            Self::Rage => ClipName::Rage,
            Self::Nuzzle => ClipName::Nuzzle,
            Self::Eat => ClipName::Eat,
            Self::Wake => ClipName::SleepWake,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Roar => "roar",
            Self::Rage => "rage",
            Self::Nuzzle => "nuzzle",
            Self::Eat => "eat",
            Self::Wake => "wake",
        };
        f.write_str(name)
    }
}

/// Pet state the gate checks against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Guard {
    pub locked: bool,
    pub sleeping: bool,
}

impl Guard {
    #[inline]
    pub const fn blocked(self) -> bool {
        self.locked || self.sleeping
    }
}

/// A gate timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateFire {
    /// The intent passed the guard.
    Resolved(Intent),
    /// The pet became busy before the timer fired.
    Dropped(Intent),
}

/// Burst counter plus the debounce and press timers.
#[derive(Debug)]
pub struct InteractionGate {
    debounce: Duration,
    press_threshold: Duration,
    burst: u32,
    burst_timer: Timer,
    press_timer: Timer,
}

impl InteractionGate {
    /// Empty gate with the given timings.
    pub const fn new(debounce: Duration, press_threshold: Duration) -> Self {
        Self {
            debounce,
            press_threshold,
            burst: 0,
            burst_timer: Timer::new(),
            press_timer: Timer::new(),
        }
    }

    /// Taps counted in the current burst.
    #[inline]
    pub const fn burst_count(&self) -> u32 {
        self.burst
    }

    /// Whether a press is being held towards a nuzzle.
    #[inline]
    pub const fn press_pending(&self) -> bool {
        self.press_timer.is_pending()
    }

    /// Count a tap and restart the debounce. Returns whether it counted.
    pub(crate) fn tap(&mut self, guard: Guard, now: Instant) -> bool {
        if guard.blocked() {
            debug!("gate: tap ignored ({guard:?})");
            return false;
        }
        self.burst += 1;
        self.burst_timer.arm(now, self.debounce);
        true
    }

    pub(crate) fn press_start(&mut self, guard: Guard, now: Instant) -> bool {
        if guard.blocked() {
            debug!("gate: press ignored ({guard:?})");
            return false;
        }
        self.press_timer.arm(now, self.press_threshold);
        true
    }

    pub(crate) fn press_end(&mut self) {
        if self.press_timer.cancel() {
            debug!("gate: press released before threshold");
        }
    }

    pub(crate) fn feed(&mut self, guard: Guard) -> Option<Intent> {
        if guard.blocked() {
            debug!("gate: feed ignored ({guard:?})");
            return None;
        }
        self.reset_burst();
        Some(Intent::Eat)
    }

    pub(crate) fn wake(guard: Guard) -> Option<Intent> {
        if !guard.sleeping {
            debug!("gate: wake ignored, not sleeping");
            return None;
        }
        Some(Intent::Wake)
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        [self.burst_timer.deadline(), self.press_timer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Fire the earliest due timer.
    pub(crate) fn take_due(&mut self, now: Instant, guard: Guard) -> Option<(Instant, GateFire)> {
        let burst = self.burst_timer.due(now);
        let press = self.press_timer.due(now);
        match (burst, press) {
            (Some(b), Some(p)) if p < b => Some((p, self.fire_press(guard))),
            (Some(b), _) => Some((b, self.fire_burst(guard))),
            (None, Some(p)) => Some((p, self.fire_press(guard))),
            (None, None) => None,
        }
    }

    fn fire_burst(&mut self, guard: Guard) -> GateFire {
        self.burst_timer.cancel();
        let intent = if self.burst > RAGE_ABOVE { Intent::Rage } else { Intent::Roar };
        self.burst = 0;
        if guard.blocked() {
            GateFire::Dropped(intent)
        } else {
            GateFire::Resolved(intent)
        }
    }

    fn fire_press(&mut self, guard: Guard) -> GateFire {
        self.press_timer.cancel();
        if guard.blocked() {
            return GateFire::Dropped(Intent::Nuzzle);
        }
        self.reset_burst();
        GateFire::Resolved(Intent::Nuzzle)
    }

    fn reset_burst(&mut self) {
        self.burst = 0;
        self.burst_timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREE: Guard = Guard { locked: false, sleeping: false };
    const LOCKED: Guard = Guard { locked: true, sleeping: false };
    const ASLEEP: Guard = Guard { locked: false, sleeping: true };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn gate() -> InteractionGate {
        InteractionGate::new(ms(500), ms(500))
    }

    #[test]
    fn test_single_tap_roars() {
        let t0 = Instant::now();
        let mut gate = gate();
        assert!(gate.tap(FREE, t0));
        assert!(gate.take_due(t0 + ms(499), FREE).is_none());
        assert_eq!(gate.take_due(t0 + ms(500), FREE), Some((t0 + ms(500), GateFire::Resolved(Intent::Roar))));
        assert_eq!(gate.burst_count(), 0);
    }

    #[test]
    fn test_two_taps_roar() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.tap(FREE, t0);
        gate.tap(FREE, t0 + ms(200));
        assert!(gate.take_due(t0 + ms(600), FREE).is_none(), "debounce restarted");
        assert_eq!(gate.take_due(t0 + ms(700), FREE).map(|f| f.1), Some(GateFire::Resolved(Intent::Roar)));
    }

    #[test]
    fn test_three_taps_rage() {
        let t0 = Instant::now();
        let mut gate = gate();
        for i in 0..3 {
            gate.tap(FREE, t0 + ms(i * 100));
        }
        assert_eq!(gate.burst_count(), 3);
        assert_eq!(gate.take_due(t0 + ms(2_000), FREE).map(|f| f.1), Some(GateFire::Resolved(Intent::Rage)));
    }

    #[test]
    fn test_blocked_inputs_ignored() {
        let t0 = Instant::now();
        let mut gate = gate();
        assert!(!gate.tap(LOCKED, t0));
        assert!(!gate.tap(ASLEEP, t0));
        assert!(!gate.press_start(LOCKED, t0));
        assert!(gate.feed(LOCKED).is_none());
        assert!(gate.feed(ASLEEP).is_none());
        assert!(gate.next_deadline().is_none());
    }

    #[test]
    fn test_burst_dropped_if_locked_by_fire_time() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.tap(FREE, t0);
        assert_eq!(gate.take_due(t0 + ms(500), LOCKED).map(|f| f.1), Some(GateFire::Dropped(Intent::Roar)));
        assert_eq!(gate.burst_count(), 0);
    }

    #[test]
    fn test_press_becomes_nuzzle() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.tap(FREE, t0);
        assert!(gate.press_start(FREE, t0 + ms(100)));
        assert_eq!(gate.take_due(t0 + ms(600), FREE), Some((t0 + ms(500), GateFire::Resolved(Intent::Roar))));
        assert_eq!(gate.take_due(t0 + ms(600), FREE), Some((t0 + ms(600), GateFire::Resolved(Intent::Nuzzle))));
    }

    #[test]
    fn test_press_cancels_burst() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.press_start(FREE, t0);
        gate.tap(FREE, t0 + ms(300));
        assert_eq!(gate.take_due(t0 + ms(500), FREE).map(|f| f.1), Some(GateFire::Resolved(Intent::Nuzzle)));
        assert_eq!(gate.burst_count(), 0);
        assert!(gate.next_deadline().is_none());
    }

    #[test]
    fn test_press_end_cancels() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.press_start(FREE, t0);
        gate.press_end();
        assert!(!gate.press_pending());
        assert!(gate.take_due(t0 + ms(1_000), FREE).is_none());
    }

    #[test]
    fn test_feed_resets_burst() {
        let t0 = Instant::now();
        let mut gate = gate();
        gate.tap(FREE, t0);
        assert_eq!(gate.feed(FREE), Some(Intent::Eat));
        assert_eq!(gate.burst_count(), 0);
        assert!(gate.next_deadline().is_none());
    }

    #[test]
    fn test_wake_only_when_sleeping() {
        assert_eq!(InteractionGate::wake(FREE), None);
        assert_eq!(InteractionGate::wake(LOCKED), None);
        assert_eq!(InteractionGate::wake(ASLEEP), Some(Intent::Wake));
    }

    #[test]
    fn test_intent_clips() {
        assert_eq!(Intent::Wake.clip(), ClipName::SleepWake);
        assert_eq!(Intent::Rage.clip(), ClipName::Rage);
        assert_eq!(Intent::Eat.to_string(), "eat");
    }
}
