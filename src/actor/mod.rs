//! Actor Model: Message-passing concurrency for the terminal front-end.
//!
//! The pet state machine is single-threaded. The threads here only deal
//! with the terminal, all connected with crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards to main loop
//! - **Render Actor**: Receives composed frames, diffs and flushes
//! - **Ticker Actor**: Paces frames
//! - **Main Loop**: Owns the stage (and with it the pet)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Main Loop   │
//! ┌──────────────┐        Tick         │  (PetStage)  │
//! │Ticker Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀───────────────── │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod engine;
mod input;
mod messages;
mod renderer;
mod ticker;

pub use engine::{Engine, EngineConfig};
pub use input::InputActor;
pub use messages::{InputEvent, KeyCode, MouseButton, MouseEvent, RenderCommand};
pub use renderer::RendererActor;
pub use ticker::{Tick, TickerActor};
