//! Transition Engine: switches the visible clip.
//!
//! A transition runs in two halves. [`TransitionEngine::begin`] does all
//! the synchronous work (freeze the outgoing frame, hide the old clip,
//! rewind and show the new one, take the lock, request playback). The
//! rest waits on media signals: `Playing` releases the freeze frame and
//! records the new clip, `Ended` completes one-shot exclusive clips. What
//! should happen afterwards is stored as a [`Continuation`] and handed
//! back to the pet when the transition resolves.
//!
//! Only the clip that was most recently shown can have a transition in
//! flight, so at most one continuation is ever pending.

use super::event::PetEvent;
use super::freeze::FreezeFrame;
use crate::clip::{ClipMedia, ClipName, ClipRegistry};
use crate::error::PlaybackError;
use log::{debug, warn};

/// What to play and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Target clip.
    pub clip: ClipName,
    /// Loop the target.
    pub looping: bool,
    /// Hold the global lock while the target is committed.
    pub exclusive: bool,
}

impl TransitionRequest {
    /// A request with explicit flags.
    pub const fn new(clip: ClipName, looping: bool, exclusive: bool) -> Self {
        Self { clip, looping, exclusive }
    }

    /// Play once, locked, and resolve when the clip ends.
    pub const fn one_shot(clip: ClipName) -> Self {
        Self::new(clip, false, true)
    }

    /// Loop without locking; resolves when rendering starts.
    pub const fn ambient(clip: ClipName) -> Self {
        Self::new(clip, true, false)
    }

    /// Resolution waits for natural completion, not just rendering.
    #[inline]
    pub const fn awaits_end(&self) -> bool {
        !self.looping && self.exclusive
    }
}

/// Immediate result of [`Pet::transition_to`](crate::Pet::transition_to).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Target absent or already shown; nothing changed.
    NoOp,
    /// Playback requested; resolution follows from media events.
    Pending,
    /// Playback was rejected; treated as resolved.
    Failed(PlaybackError),
}

/// Work that runs once a transition resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// Nothing follows.
    Nothing,
    /// Return to Idle (after a reaction or waking up).
    EnterIdle,
    /// Idle is showing: arm the scheduler after the settle delay.
    SettleThenArm,
    /// Arm the scheduler right away.
    ArmIdle,
    /// Sleep onset completed: mark asleep and loop the sleep clip.
    SleepOnsetDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitPlaying,
    AwaitEnded,
}

#[derive(Debug)]
struct InFlight {
    request: TransitionRequest,
    stage: Stage,
    then: Continuation,
}

/// Result of [`TransitionEngine::begin`].
#[derive(Debug)]
pub(crate) enum Begin {
    /// Resolved synchronously; the caller runs the continuation now.
    Resolved(TransitionOutcome, Continuation),
    /// Waiting on media events.
    Pending,
}

/// Owns the global lock and the visible/current clip references.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    locked: bool,
    /// Clip most recently made visible (possibly not rendering yet).
    shown: Option<ClipName>,
    /// Clip confirmed rendering. Cleared when it is hidden.
    current: Option<ClipName>,
    in_flight: Option<InFlight>,
}

impl TransitionEngine {
    /// Unlocked, nothing shown.
    pub const fn new() -> Self {
        Self {
            locked: false,
            shown: None,
            current: None,
            in_flight: None,
        }
    }

    /// Whether an exclusive animation is committed.
    #[inline]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Clip confirmed rendering.
    #[inline]
    pub const fn current(&self) -> Option<ClipName> {
        self.current
    }

    /// Clip most recently made visible.
    #[inline]
    pub const fn shown(&self) -> Option<ClipName> {
        self.shown
    }

    /// Target of the unresolved transition, if any.
    #[inline]
    pub fn pending(&self) -> Option<ClipName> {
        self.in_flight.as_ref().map(|f| f.request.clip)
    }

    #[inline]
    pub(crate) const fn lock(&mut self) {
        self.locked = true;
    }

    #[inline]
    pub(crate) const fn unlock(&mut self) {
        self.locked = false;
    }

    /// Start a transition. Idle-timer cancellation is the caller's job,
    /// done whenever this does not resolve as a no-op.
    pub(crate) fn begin<M: ClipMedia>(
        &mut self,
        request: TransitionRequest,
        then: Continuation,
        registry: &mut ClipRegistry<M>,
        freeze: &mut FreezeFrame,
        viewport: (u32, u32),
        events: &mut Vec<PetEvent>,
    ) -> Begin {
        if !registry.contains(request.clip) {
            debug!("transition: {} not in this theme, no-op", request.clip);
            return Begin::Resolved(TransitionOutcome::NoOp, then);
        }
        if self.shown == Some(request.clip) {
            debug!("transition: {} already shown, no-op", request.clip);
            return Begin::Resolved(TransitionOutcome::NoOp, then);
        }

        if let Some(outgoing) = self.shown.and_then(|name| registry.get_mut(name)) {
            freeze.capture(&*outgoing, viewport);
            outgoing.pause();
            outgoing.set_visible(false);
        }
        self.current = None;
        if let Some(stale) = self.in_flight.take() {
            debug!(
                "transition: {} superseded before resolving, dropping {:?}",
                stale.request.clip, stale.then
            );
        }

        let Some(target) = registry.get_mut(request.clip) else {
            return Begin::Resolved(TransitionOutcome::NoOp, then);
        };
        target.seek_to_start();
        target.set_looping(request.looping);
        target.set_visible(true);
        if request.exclusive {
            self.locked = true;
        }
        self.shown = Some(request.clip);
        events.push(PetEvent::TransitionStarted {
            clip: request.clip,
            looping: request.looping,
            exclusive: request.exclusive,
        });

        match target.play() {
            Ok(()) => {
                self.in_flight = Some(InFlight {
                    request,
                    stage: Stage::AwaitPlaying,
                    then,
                });
                Begin::Pending
            }
            Err(error) => {
                warn!("transition: playback of {} rejected: {error}", request.clip);
                events.push(PetEvent::PlaybackFailed {
                    clip: request.clip,
                    error: error.clone(),
                });
                events.push(PetEvent::TransitionFinished(request.clip));
                Begin::Resolved(TransitionOutcome::Failed(error), then)
            }
        }
    }

    /// `clip` is rendering. Returns the continuation if this resolved the
    /// transition.
    pub(crate) fn confirm_playing(
        &mut self,
        clip: ClipName,
        freeze: &mut FreezeFrame,
        events: &mut Vec<PetEvent>,
    ) -> Option<Continuation> {
        let awaits_end = match self.in_flight.as_ref() {
            Some(f) if f.request.clip == clip && f.stage == Stage::AwaitPlaying => f.request.awaits_end(),
            _ => {
                debug!("transition: ignoring playing signal from {clip}");
                return None;
            }
        };

        freeze.release();
        self.current = Some(clip);
        events.push(PetEvent::ClipRendering(clip));

        if awaits_end {
            if let Some(flight) = self.in_flight.as_mut() {
                flight.stage = Stage::AwaitEnded;
            }
            None
        } else {
            self.finish(events)
        }
    }

    /// `clip` reached its end.
    pub(crate) fn confirm_ended(&mut self, clip: ClipName, events: &mut Vec<PetEvent>) -> Option<Continuation> {
        match self.in_flight.as_ref() {
            Some(f) if f.request.clip == clip && f.stage == Stage::AwaitEnded => self.finish(events),
            _ => {
                debug!("transition: ignoring ended signal from {clip}");
                None
            }
        }
    }

    /// `clip` failed after accepting playback. Resolves its transition.
    pub(crate) fn fail(
        &mut self,
        clip: ClipName,
        error: PlaybackError,
        events: &mut Vec<PetEvent>,
    ) -> Option<Continuation> {
        if self.pending() != Some(clip) {
            debug!("transition: ignoring failure of {clip}: {error}");
            return None;
        }
        warn!("transition: playback of {clip} failed: {error}");
        events.push(PetEvent::PlaybackFailed { clip, error });
        self.finish(events)
    }

    /// Forget everything about the installed clips (theme swap). The
    /// unresolved transition, if any, is dropped without running.
    pub(crate) fn invalidate(&mut self, freeze: &mut FreezeFrame) {
        if let Some(stale) = self.in_flight.take() {
            debug!("transition: theme swap drops in-flight {}", stale.request.clip);
        }
        self.shown = None;
        self.current = None;
        freeze.release();
    }

    fn finish(&mut self, events: &mut Vec<PetEvent>) -> Option<Continuation> {
        let flight = self.in_flight.take()?;
        events.push(PetEvent::TransitionFinished(flight.request.clip));
        Some(flight.then)
    }
}
