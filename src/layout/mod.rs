//! Layout module: rectangles in terminal cell space.
//!
//! The stage splits the screen once per resize into the pet viewport and
//! the status line; both are plain [`Rect`]s.

mod rect;

pub use rect::Rect;
