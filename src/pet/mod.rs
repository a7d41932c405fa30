//! The pet state machine.
//!
//! [`Pet`] is the single context object: it owns the clip registry, the
//! freeze frame, the transition engine (lock and current clip), the
//! idle/sleep scheduler, the interaction gate and the theme loader. It is
//! driven from outside by three calls, all taking the caller's notion of
//! "now":
//!
//! - [`Pet::signal`] for user input,
//! - [`Pet::media_event`] for clip readiness and playback signals,
//! - [`Pet::poll`] when [`Pet::next_deadline`] has passed.
//!
//! Nothing here blocks, spawns or reads the clock, so a whole session can
//! be replayed deterministically.

mod event;
mod freeze;
mod gate;
mod loading;
mod scheduler;
mod timer;
mod transition;

pub use event::PetEvent;
pub use freeze::FreezeFrame;
pub use gate::{Intent, InteractionGate};
pub use scheduler::IdleScheduler;
pub use timer::Timer;
pub use transition::{TransitionEngine, TransitionOutcome, TransitionRequest};

use crate::clip::{ClipMedia, ClipName, ClipRegistry, ClipSet, MediaEvent, MediaEventKind, Theme};
use crate::config::PetConfig;
use crate::error::PetResult;
use gate::{GateFire, Guard};
use loading::{LoadTracker, LoadingNotice, NoticeFire};
use log::{debug, info, warn};
use scheduler::SchedulerFire;
use std::time::Instant;
use transition::{Begin, Continuation};

/// Raw user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// A click or tap.
    Tap,
    /// Pointer went down.
    PressStart,
    /// Pointer went up.
    PressEnd,
    /// Feed trigger.
    Feed,
    /// Explicit wake trigger.
    Wake,
}

/// An interactive animated pet over a set of clips.
#[derive(Debug)]
pub struct Pet<M> {
    config: PetConfig,
    registry: ClipRegistry<M>,
    freeze: FreezeFrame,
    engine: TransitionEngine,
    scheduler: IdleScheduler,
    gate: InteractionGate,
    loader: LoadTracker<M>,
    notice: LoadingNotice,
    viewport: (u32, u32),
    events: Vec<PetEvent>,
}

impl<M: ClipMedia> Pet<M> {
    /// Create a pet with nothing loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::Config`](crate::PetError::Config) if `config`
    /// fails validation.
    pub fn new(config: PetConfig) -> PetResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: ClipRegistry::new(),
            freeze: FreezeFrame::new(),
            engine: TransitionEngine::new(),
            scheduler: IdleScheduler::new(config.idle_delay(), config.idle_settle()),
            gate: InteractionGate::new(config.debounce(), config.press_threshold()),
            loader: LoadTracker::new(config.load_timeout()),
            notice: LoadingNotice::new(config.loading_notice(), config.notice_fade()),
            viewport: (config.viewport_width, config.viewport_height),
            events: Vec::new(),
            config,
        })
    }

    // ---- driving ----

    /// Stage `clips` for `theme`. They are committed once every clip has
    /// reported [`MediaEventKind::Ready`], or when the load timeout passes.
    /// The current set keeps playing until then.
    pub fn load_theme(&mut self, theme: Theme, clips: ClipSet<M>, now: Instant) {
        info!("pet: loading {theme:?} ({} clips)", clips.len());
        self.loader.stage(theme, clips, now);
        if self.loader.is_complete() {
            self.commit(now);
        }
    }

    /// Feed user input.
    pub fn signal(&mut self, signal: Signal, now: Instant) {
        if !self.is_loaded() {
            if signal == Signal::Tap && self.notice.raise(now) {
                self.events.push(PetEvent::LoadingNotice(true));
            } else {
                debug!("pet: {signal:?} ignored while loading");
            }
            return;
        }

        let guard = self.guard();
        match signal {
            Signal::Tap if guard.sleeping => self.accept(InteractionGate::wake(guard), now),
            Signal::Tap => {
                self.gate.tap(guard, now);
            }
            Signal::PressStart => {
                self.gate.press_start(guard, now);
            }
            Signal::PressEnd => self.gate.press_end(),
            Signal::Feed => {
                let intent = self.gate.feed(guard);
                self.accept(intent, now);
            }
            Signal::Wake => self.accept(InteractionGate::wake(guard), now),
        }
    }

    /// Feed a media signal. `Ready` is attributed to the set being loaded;
    /// the playback signals to the installed set. Signals nothing waits on
    /// are ignored.
    pub fn media_event(&mut self, event: MediaEvent, now: Instant) {
        let clip = event.clip;
        let then = match event.kind {
            MediaEventKind::Ready => {
                self.loader.mark_ready(clip);
                if self.loader.is_complete() {
                    self.commit(now);
                }
                None
            }
            MediaEventKind::Playing => self.engine.confirm_playing(clip, &mut self.freeze, &mut self.events),
            MediaEventKind::Ended => self.engine.confirm_ended(clip, &mut self.events),
            MediaEventKind::Failed(error) => self.engine.fail(clip, error, &mut self.events),
        };
        if let Some(then) = then {
            self.resume(then, now);
        }
    }

    /// Fire every timer due at `now`, earliest first. Each fires with its
    /// own deadline as the current time.
    pub fn poll(&mut self, now: Instant) {
        while let Some(at) = self.next_deadline().filter(|at| *at <= now) {
            if !self.fire(at) {
                break;
            }
        }
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.loader.next_deadline(),
            self.notice.next_deadline(),
            self.gate.next_deadline(),
            self.scheduler.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Request a transition directly, bypassing the gate. Nothing follows
    /// its resolution; an exclusive request leaves the lock set.
    pub fn transition_to(&mut self, request: TransitionRequest, now: Instant) -> TransitionOutcome {
        self.request(request, Continuation::Nothing, now)
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PetEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set the viewport used for freeze-frame captures.
    pub const fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    // ---- state ----

    /// Whether an exclusive animation holds the lock.
    #[inline]
    pub const fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }

    /// Whether the pet is asleep.
    #[inline]
    pub const fn is_sleeping(&self) -> bool {
        self.scheduler.is_sleeping()
    }

    /// Whether a clip set has been committed.
    #[inline]
    pub const fn is_loaded(&self) -> bool {
        self.registry.theme().is_some()
    }

    /// Theme of the installed set.
    #[inline]
    pub const fn theme(&self) -> Option<Theme> {
        self.registry.theme()
    }

    /// Theme still loading, if any.
    pub fn loading_theme(&self) -> Option<Theme> {
        self.loader.staged_theme()
    }

    /// Clip confirmed rendering.
    #[inline]
    pub const fn current_clip(&self) -> Option<ClipName> {
        self.engine.current()
    }

    /// Clip most recently made visible.
    #[inline]
    pub const fn visible_clip(&self) -> Option<ClipName> {
        self.engine.shown()
    }

    /// Target of the unresolved transition.
    pub fn pending_clip(&self) -> Option<ClipName> {
        self.engine.pending()
    }

    /// Taps in the current burst.
    #[inline]
    pub const fn burst_count(&self) -> u32 {
        self.gate.burst_count()
    }

    /// Pending idle-timer deadline.
    #[inline]
    pub const fn idle_deadline(&self) -> Option<Instant> {
        self.scheduler.idle_deadline()
    }

    /// Whether the loading notice is up.
    #[inline]
    pub const fn loading_notice_active(&self) -> bool {
        self.notice.is_active()
    }

    /// The freeze-frame compositor.
    #[inline]
    pub const fn freeze_frame(&self) -> &FreezeFrame {
        &self.freeze
    }

    /// Installed clips.
    #[inline]
    pub const fn registry(&self) -> &ClipRegistry<M> {
        &self.registry
    }

    /// Installed clips, for a driver that advances them.
    pub fn clips_mut(&mut self) -> impl Iterator<Item = (ClipName, &mut M)> {
        self.registry.iter_mut()
    }

    /// Clips still loading, for a driver that advances them.
    pub fn staged_clips_mut(&mut self) -> impl Iterator<Item = (ClipName, &mut M)> {
        self.loader.staged_mut()
    }

    /// Active configuration.
    #[inline]
    pub const fn config(&self) -> &PetConfig {
        &self.config
    }

    /// Viewport used for freeze-frame captures.
    #[inline]
    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    // ---- internals ----

    const fn guard(&self) -> Guard {
        Guard {
            locked: self.engine.is_locked(),
            sleeping: self.scheduler.is_sleeping(),
        }
    }

    fn accept(&mut self, intent: Option<Intent>, now: Instant) {
        if let Some(intent) = intent {
            self.run_intent(intent, now);
        }
    }

    fn run_intent(&mut self, intent: Intent, now: Instant) {
        debug!("pet: intent {intent}");
        self.events.push(PetEvent::IntentResolved(intent));
        if intent == Intent::Wake {
            self.wake(now);
            return;
        }
        self.engine.lock();
        self.request(TransitionRequest::one_shot(intent.clip()), Continuation::EnterIdle, now);
    }

    fn wake(&mut self, now: Instant) {
        info!("pet: waking up");
        self.scheduler.leave_sleep();
        self.engine.lock();
        self.events.push(PetEvent::Woke);
        self.request(TransitionRequest::one_shot(ClipName::SleepWake), Continuation::EnterIdle, now);
    }

    fn fall_asleep(&mut self, now: Instant) {
        info!("pet: idle timeout, dozing off");
        self.engine.lock();
        self.request(TransitionRequest::one_shot(ClipName::SleepStart), Continuation::SleepOnsetDone, now);
    }

    fn enter_idle(&mut self, now: Instant) {
        self.scheduler.leave_sleep();
        self.engine.unlock();
        self.request(TransitionRequest::ambient(ClipName::Idle), Continuation::SettleThenArm, now);
    }

    fn request(&mut self, request: TransitionRequest, then: Continuation, now: Instant) -> TransitionOutcome {
        let begin = self.engine.begin(
            request,
            then,
            &mut self.registry,
            &mut self.freeze,
            self.viewport,
            &mut self.events,
        );
        match begin {
            Begin::Pending => {
                self.scheduler.cancel();
                TransitionOutcome::Pending
            }
            Begin::Resolved(outcome, then) => {
                if matches!(outcome, TransitionOutcome::Failed(_)) {
                    self.scheduler.cancel();
                }
                self.resume(then, now);
                outcome
            }
        }
    }

    fn resume(&mut self, then: Continuation, now: Instant) {
        match then {
            Continuation::Nothing => {}
            Continuation::EnterIdle => self.enter_idle(now),
            Continuation::SettleThenArm => self.scheduler.begin_settle(now),
            Continuation::ArmIdle => self.scheduler.rearm(now),
            Continuation::SleepOnsetDone => {
                info!("pet: asleep");
                self.scheduler.enter_sleep();
                self.events.push(PetEvent::SleepEntered);
                self.request(
                    TransitionRequest::new(ClipName::SleepLoop, true, true),
                    Continuation::ArmIdle,
                    now,
                );
            }
        }
    }

    /// Install the staged set and resume on it.
    fn commit(&mut self, now: Instant) {
        let Some((theme, clips)) = self.loader.take() else {
            return;
        };
        let first = !self.is_loaded();

        if !first {
            self.scheduler.cancel_all();
            if let Some(old) = self.engine.shown().and_then(|name| self.registry.get_mut(name)) {
                old.pause();
                old.set_visible(false);
            }
            self.engine.invalidate(&mut self.freeze);
        }
        self.registry.install(theme, clips);
        info!("pet: {theme:?} installed");
        self.events.push(PetEvent::ThemeInstalled(theme));

        if first && self.notice.dismiss() {
            self.events.push(PetEvent::LoadingNotice(false));
        }

        if self.scheduler.is_sleeping() {
            self.engine.lock();
            self.request(
                TransitionRequest::new(ClipName::SleepLoop, true, true),
                Continuation::ArmIdle,
                now,
            );
        } else {
            self.engine.unlock();
            self.request(TransitionRequest::ambient(ClipName::Idle), Continuation::ArmIdle, now);
        }
    }

    /// Fire the timer due at `at`. Returns false if none was.
    fn fire(&mut self, at: Instant) -> bool {
        if self.loader.take_due(at).is_some() {
            warn!("pet: load timeout, committing without every clip ready");
            self.commit(at);
            return true;
        }
        if let Some((_, fire)) = self.notice.take_due(at) {
            if fire == NoticeFire::Hidden {
                self.events.push(PetEvent::LoadingNotice(false));
            }
            return true;
        }
        let guard = self.guard();
        if let Some((_, fire)) = self.gate.take_due(at, guard) {
            match fire {
                GateFire::Resolved(intent) => self.run_intent(intent, at),
                GateFire::Dropped(intent) => {
                    debug!("pet: {intent} dropped, pet became busy");
                    self.events.push(PetEvent::IntentDropped(intent));
                }
            }
            return true;
        }
        match self.scheduler.take_due(at) {
            Some((_, SchedulerFire::Idle)) => self.fall_asleep(at),
            Some((_, SchedulerFire::Settled)) => {
                // A failed Idle still counts as shown, so the pet can doze off.
                if self.engine.shown() == Some(ClipName::Idle) && !self.scheduler.is_sleeping() {
                    self.scheduler.rearm(at);
                } else {
                    debug!("pet: settle elapsed but Idle is not showing, not arming");
                }
            }
            None => return false,
        }
        true
    }
}
