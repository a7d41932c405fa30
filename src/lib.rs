//! # petclip
//!
//! An interactive animated pet driven by a fixed set of video clips.
//!
//! The pet reacts to taps, presses and feeding with short exclusive
//! animations, dozes off after a stretch without interaction, and swaps
//! between a day and a night clip set. Clip switches are covered by a
//! freeze frame of the outgoing clip so the viewport never flashes blank.
//!
//! ## Core Concepts
//!
//! - **One context object**: [`Pet`] owns every piece of mutable state
//! - **Explicit continuations**: media signals (`Playing`, `Ended`) resume
//!   transitions instead of async chains
//! - **Caller-supplied time**: the core never reads the clock, so sessions
//!   replay deterministically
//! - **Opaque media**: clips are driven through the [`ClipMedia`] trait
//!
//! A terminal front-end ([`PetStage`] on the actor [`Engine`]) renders a
//! procedural pet with half-block pixels.
//!
//! ## Example
//!
//! ```rust,ignore
//! use petclip::{MediaEvent, Pet, PetConfig, Signal, SyntheticClip, Theme, ClipName};
//! use std::time::Instant;
//!
//! let mut pet = Pet::new(PetConfig::default())?;
//! let now = Instant::now();
//! pet.load_theme(Theme::Day, SyntheticClip::theme_set(Theme::Day), now);
//! for name in ClipName::ALL {
//!     pet.media_event(MediaEvent::ready(name), now);
//! }
//! pet.signal(Signal::Feed, now);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod clip;
pub mod config;
pub mod error;
pub mod layout;
pub mod pet;
pub mod stage;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, InputEvent, KeyCode, MouseButton, MouseEvent, RenderCommand};
pub use buffer::{Buffer, Cell, Frame, Modifiers, Rgb, Style};
pub use clip::{ClipMedia, ClipName, ClipRegistry, ClipSet, MediaEvent, MediaEventKind, SyntheticClip, Theme};
pub use config::PetConfig;
pub use error::{PetError, PetResult, PlaybackError};
pub use layout::Rect;
pub use pet::{Intent, Pet, PetEvent, Signal, TransitionOutcome, TransitionRequest};
pub use stage::{PetStage, StageControl};
