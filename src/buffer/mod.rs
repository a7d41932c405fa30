//! Pixels, terminal cells and the diff between frames.
//!
//! - [`Frame`]: RGB pixel grid that clips and the freeze frame render into
//! - [`Buffer`]: the cell grid the stage composes into
//! - [`Cell`], [`Style`], [`Rgb`], [`Modifiers`]: what a cell holds
//! - [`diff`]: minimal ANSI output between two buffers

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
mod frame;
pub mod diff;

pub use buffer::Buffer;
pub use cell::{Cell, Modifiers, Rgb, Style};
pub use frame::{cover_crop, CropRect, Frame};
