//! Observable events emitted by the pet, in the order they happen.

use super::Intent;
use crate::clip::{ClipName, Theme};
use crate::error::PlaybackError;

/// Something the pet did. Drained with [`Pet::drain_events`](crate::Pet::drain_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetEvent {
    /// A transition passed its checks and asked `clip` to play.
    TransitionStarted {
        /// Target clip.
        clip: ClipName,
        /// Whether the target loops.
        looping: bool,
        /// Whether the transition holds the global lock.
        exclusive: bool,
    },
    /// `clip` confirmed it is rendering; the freeze frame is gone.
    ClipRendering(ClipName),
    /// The transition to `clip` resolved.
    TransitionFinished(ClipName),
    /// `clip` refused or aborted playback; the transition resolved anyway.
    PlaybackFailed {
        /// Clip that failed.
        clip: ClipName,
        /// Reported reason.
        error: PlaybackError,
    },
    /// The interaction gate issued an intent.
    IntentResolved(Intent),
    /// A timer resolved an intent but the pet had become busy meanwhile.
    IntentDropped(Intent),
    /// Sleep onset finished; the pet is asleep.
    SleepEntered,
    /// A wake request was accepted.
    Woke,
    /// A clip set was committed to the registry.
    ThemeInstalled(Theme),
    /// The "still loading" notice was shown (`true`) or hidden (`false`).
    LoadingNotice(bool),
}
