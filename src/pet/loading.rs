//! Theme loading: readiness tracking with a fallback deadline, and the
//! "still loading" notice shown when the user taps too early.

use super::timer::Timer;
use crate::clip::{ClipMedia, ClipName, ClipSet, Theme};
use log::debug;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// A staged clip set waiting for its clips to report ready.
#[derive(Debug)]
struct Staged<M> {
    theme: Theme,
    clips: ClipSet<M>,
    ready: BTreeSet<ClipName>,
}

/// Collects `Ready` signals for a staged set. A set is handed out at most
/// once, either when every clip is ready or when the fallback fires.
#[derive(Debug)]
pub(crate) struct LoadTracker<M> {
    timeout: Duration,
    staged: Option<Staged<M>>,
    fallback: Timer,
}

impl<M: ClipMedia> LoadTracker<M> {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            staged: None,
            fallback: Timer::new(),
        }
    }

    /// Stage `clips`, replacing (and releasing) a set still loading.
    pub fn stage(&mut self, theme: Theme, clips: ClipSet<M>, now: Instant) {
        if let Some(mut previous) = self.staged.take() {
            debug!("loader: {:?} superseded by {theme:?} before it loaded", previous.theme);
            for clip in previous.clips.values_mut() {
                clip.release();
            }
        }
        self.staged = Some(Staged {
            theme,
            clips,
            ready: BTreeSet::new(),
        });
        self.fallback.arm(now, self.timeout);
    }

    /// Theme being loaded.
    pub fn staged_theme(&self) -> Option<Theme> {
        self.staged.as_ref().map(|s| s.theme)
    }

    /// Record `clip` as ready. Signals for clips not in the staged set are
    /// ignored.
    pub fn mark_ready(&mut self, clip: ClipName) {
        match self.staged.as_mut() {
            Some(staged) if staged.clips.contains_key(&clip) => {
                staged.ready.insert(clip);
            }
            _ => debug!("loader: ignoring ready signal from {clip}"),
        }
    }

    /// Whether the staged set is fully ready.
    pub fn is_complete(&self) -> bool {
        self.staged
            .as_ref()
            .is_some_and(|s| s.clips.keys().all(|name| s.ready.contains(name)))
    }

    /// Hand out the staged set and stop the fallback.
    pub fn take(&mut self) -> Option<(Theme, ClipSet<M>)> {
        self.fallback.cancel();
        self.staged.take().map(|s| (s.theme, s.clips))
    }

    /// Clips still loading, so a driver can advance them.
    pub fn staged_mut(&mut self) -> impl Iterator<Item = (ClipName, &mut M)> {
        self.staged
            .iter_mut()
            .flat_map(|s| s.clips.iter_mut().map(|(name, clip)| (*name, clip)))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.fallback.deadline()
    }

    /// The fallback deadline, if it fired.
    pub fn take_due(&mut self, now: Instant) -> Option<Instant> {
        self.fallback.take_due(now)
    }
}

/// Which notice timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeFire {
    /// Display time elapsed; the notice is hidden.
    Hidden,
    /// Fade guard elapsed; the notice may show again.
    Rearmed,
}

/// Display and fade-guard state of the loading notice.
#[derive(Debug)]
pub(crate) struct LoadingNotice {
    show_for: Duration,
    fade: Duration,
    active: bool,
    hide: Timer,
    rearm: Timer,
}

impl LoadingNotice {
    pub const fn new(show_for: Duration, fade: Duration) -> Self {
        Self {
            show_for,
            fade,
            active: false,
            hide: Timer::new(),
            rearm: Timer::new(),
        }
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Show the notice unless it is up or still fading. Returns whether it
    /// was raised.
    pub fn raise(&mut self, now: Instant) -> bool {
        if self.active || self.rearm.is_pending() {
            return false;
        }
        self.active = true;
        self.hide.arm(now, self.show_for);
        true
    }

    /// Drop the notice for good. Returns whether it was showing.
    pub fn dismiss(&mut self) -> bool {
        self.hide.cancel();
        self.rearm.cancel();
        std::mem::take(&mut self.active)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [self.hide.deadline(), self.rearm.deadline()].into_iter().flatten().min()
    }

    pub fn take_due(&mut self, now: Instant) -> Option<(Instant, NoticeFire)> {
        if let Some(at) = self.hide.take_due(now) {
            self.active = false;
            self.rearm.arm(at, self.fade);
            return Some((at, NoticeFire::Hidden));
        }
        self.rearm.take_due(now).map(|at| (at, NoticeFire::Rearmed))
    }
}
