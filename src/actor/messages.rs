//! Messages between the terminal threads and the main loop.

use crate::buffer::Buffer;

/// Keys the pet listens to. The input thread drops everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter/Return.
    Enter,
    /// Escape.
    Esc,
}

/// Which mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary button; presses and clicks on the pet.
    Left,
    /// Right or middle; ignored by the stage.
    Other,
}

/// A mouse button going down or up at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Button.
    pub button: MouseButton,
}

impl MouseEvent {
    /// A left-button event at a cell.
    pub const fn left(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Left,
        }
    }
}

/// Sent by the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press.
    Key {
        /// Which key.
        code: KeyCode,
        /// Whether Control was held.
        ctrl: bool,
    },
    /// Mouse button pressed.
    MouseDown(MouseEvent),
    /// Mouse button released.
    MouseUp(MouseEvent),
    /// The terminal changed size.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// Reading the terminal failed.
    Error(String),
    /// The input thread is stopping.
    Shutdown,
}

impl InputEvent {
    /// A plain key press.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key { code, ctrl: false }
    }

    /// A key press with Control held.
    pub const fn ctrl(code: KeyCode) -> Self {
        Self::Key { code, ctrl: true }
    }
}

/// Sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Draw this frame in full, ignoring what is on screen.
    FullRedraw(Box<Buffer>),
    /// Draw only the cells that differ from the previous frame.
    Update(Box<Buffer>),
    /// The terminal changed size; the next frame is drawn in full.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// Flush and stop.
    Shutdown,
}
