//! Clips: the named animations a pet can show, and the media surface they
//! are played through.
//!
//! The state machine never decodes or draws anything itself. It drives an
//! opaque [`ClipMedia`] handle (show, hide, loop, seek, play, pause) and
//! learns about progress through [`MediaEvent`]s that the media layer feeds
//! back in.

mod registry;
mod synthetic;
#[cfg(test)]
pub(crate) mod testing;

pub use registry::{ClipRegistry, ClipSet};
pub use synthetic::SyntheticClip;

use crate::buffer::Frame;
use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};

/// One of the fixed set of pet animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClipName {
    /// Resting loop; the home state.
    Idle,
    /// Single-tap reaction.
    Roar,
    /// Tap-burst reaction.
    Rage,
    /// Press-and-hold reaction.
    Nuzzle,
    /// Falling asleep.
    SleepStart,
    /// Asleep (loops).
    SleepLoop,
    /// Waking up.
    SleepWake,
    /// Feeding reaction. Not every theme ships it.
    Eat,
}

impl ClipName {
    /// Every clip, in display order.
    pub const ALL: [Self; 8] = [
        Self::Idle,
        Self::Roar,
        Self::Rage,
        Self::Nuzzle,
        Self::SleepStart,
        Self::SleepLoop,
        Self::SleepWake,
        Self::Eat,
    ];

    /// File stem of the clip inside a theme's asset directory.
    pub const fn asset_stem(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Roar => "Roar",
            Self::Rage => "Rage",
            Self::Nuzzle => "Nuzzle",
            Self::SleepStart => "Sleep-start",
            Self::SleepLoop => "Sleep-loop",
            Self::SleepWake => "Sleep-wake",
            Self::Eat => "Eat",
        }
    }

    /// Whether the asset loops on its own when first loaded.
    pub const fn loops_by_default(self) -> bool {
        matches!(self, Self::Idle | Self::SleepLoop)
    }
}

impl std::fmt::Display for ClipName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.asset_stem())
    }
}

/// Asset theme a clip set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    /// Light colour scheme.
    Day,
    /// Dark colour scheme.
    Night,
}

impl Theme {
    /// Directory holding this theme's clips.
    pub const fn asset_dir(self) -> &'static str {
        match self {
            Self::Day => "day-videos",
            Self::Night => "night-videos",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }

    /// Relative asset path of `clip` in this theme, e.g. `day-videos/Idle.mp4`.
    pub fn asset_path(self, clip: ClipName) -> String {
        format!("{}/{}.mp4", self.asset_dir(), clip.asset_stem())
    }
}

/// Output surface of the rendering layer: one playable clip.
///
/// Implementations report asynchronous progress (ready, actually rendering,
/// reached the end, failed) as [`MediaEvent`]s through whatever channel the
/// driver uses; [`Pet::media_event`](crate::Pet::media_event) consumes them.
pub trait ClipMedia {
    /// Show or hide the clip.
    fn set_visible(&mut self, visible: bool);

    /// Whether playback wraps around at the end.
    fn set_looping(&mut self, looping: bool);

    /// Move the playback position to the first frame.
    fn seek_to_start(&mut self);

    /// Ask the clip to start playing. `Ok` only means the request was
    /// accepted; rendering is confirmed later by [`MediaEventKind::Playing`].
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] when the media refuses to play.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Stop advancing, keeping the current frame.
    fn pause(&mut self);

    /// Last rendered frame, if any has been decoded.
    fn frame(&self) -> Option<&Frame>;

    /// Intrinsic pixel size, known once a frame has been decoded.
    fn intrinsic_size(&self) -> Option<(u32, u32)> {
        self.frame().map(Frame::size)
    }

    /// Free the media resources. Called when the clip's set is replaced.
    fn release(&mut self) {}
}

/// What happened to a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEventKind {
    /// The clip can play through without stalling.
    Ready,
    /// The clip is actually rendering frames (not merely asked to play).
    Playing,
    /// A non-looping clip reached its end.
    Ended,
    /// Playback failed after it had been accepted.
    Failed(PlaybackError),
}

/// A signal from the media layer about one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEvent {
    /// The clip the signal is about.
    pub clip: ClipName,
    /// What happened.
    pub kind: MediaEventKind,
}

impl MediaEvent {
    /// `clip` is ready to play.
    pub const fn ready(clip: ClipName) -> Self {
        Self { clip, kind: MediaEventKind::Ready }
    }

    /// `clip` is rendering.
    pub const fn playing(clip: ClipName) -> Self {
        Self { clip, kind: MediaEventKind::Playing }
    }

    /// `clip` reached its end.
    pub const fn ended(clip: ClipName) -> Self {
        Self { clip, kind: MediaEventKind::Ended }
    }

    /// `clip` failed.
    pub const fn failed(clip: ClipName, error: PlaybackError) -> Self {
        Self { clip, kind: MediaEventKind::Failed(error) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        assert_eq!(Theme::Day.asset_path(ClipName::SleepStart), "day-videos/Sleep-start.mp4");
        assert_eq!(Theme::Night.asset_path(ClipName::Idle), "night-videos/Idle.mp4");
    }

    #[test]
    fn test_theme_opposite() {
        assert_eq!(Theme::Day.opposite(), Theme::Night);
        assert_eq!(Theme::Night.opposite().opposite(), Theme::Night);
    }

    #[test]
    fn test_default_loops() {
        let looping: Vec<ClipName> = ClipName::ALL.into_iter().filter(|c| c.loops_by_default()).collect();
        assert_eq!(looping, vec![ClipName::Idle, ClipName::SleepLoop]);
    }
}
