//! Diffing Engine: turn buffer changes into minimal ANSI output.
//!
//! Both paths go through a [`Pen`], the SGR state the terminal is known to
//! be in. A pet frame changes many cells at once, so colour tracking
//! matters more than cursor tracking: neighbouring half-block pixels
//! usually share a colour.

use super::{Buffer, Cell, Modifiers, Rgb};
use crate::layout::Rect;
use std::io::Write;

const RESET: &[u8] = b"\x1b[0m";

/// Colours and attributes last written. `None` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Modifiers,
}

impl Pen {
    /// Bring the terminal to `cell`'s attributes. Returns how many colour
    /// sequences were written.
    fn apply(&mut self, cell: &Cell, output: &mut Vec<u8>) -> usize {
        // SGR has no per-attribute "off" we rely on; dropping one resets all.
        if !self.modifiers.difference(cell.modifiers()).is_empty() {
            output.extend_from_slice(RESET);
            *self = Self::default();
        }

        let mut colours = 0;
        if self.fg != Some(cell.fg()) {
            let c = cell.fg();
            let _ = write!(output, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
            self.fg = Some(c);
            colours += 1;
        }
        if self.bg != Some(cell.bg()) {
            let c = cell.bg();
            let _ = write!(output, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b);
            self.bg = Some(c);
            colours += 1;
        }

        let added = cell.modifiers().difference(self.modifiers);
        if added.contains(Modifiers::BOLD) {
            output.extend_from_slice(b"\x1b[1m");
        }
        if added.contains(Modifiers::DIM) {
            output.extend_from_slice(b"\x1b[2m");
        }
        self.modifiers = cell.modifiers();
        colours
    }
}

/// What the terminal looks like after the last write.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    cursor: Option<(u16, u16)>,
    pen: Pen,
}

impl DiffState {
    /// Unknown cursor and colours.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            pen: Pen {
                fg: None,
                bg: None,
                modifiers: Modifiers::empty(),
            },
        }
    }

    /// Forget everything, e.g. after a full redraw.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Counters from one diff.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Cells written.
    pub cells_changed: usize,
    /// Cursor positioning sequences written.
    pub cursor_moves: usize,
    /// Colour sequences written.
    pub color_changes: usize,
}

/// Write the changes from `current` to `next` into `output`.
///
/// Only cells inside `dirty_rects` are compared; an empty slice means the
/// whole buffer. Both buffers must be the same size.
pub fn render_diff(
    current: &Buffer,
    next: &Buffer,
    dirty_rects: &[Rect],
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.area(), next.area());

    let whole = [current.area()];
    let rects = if dirty_rects.is_empty() { &whole[..] } else { dirty_rects };

    let mut result = DiffResult::default();
    for rect in rects {
        diff_rect(current, next, *rect, output, state, &mut result);
    }
    result
}

fn diff_rect(
    current: &Buffer,
    next: &Buffer,
    rect: Rect,
    output: &mut Vec<u8>,
    state: &mut DiffState,
    result: &mut DiffResult,
) {
    let width = usize::from(current.width());
    let x_end = rect.right().min(current.width());
    let y_end = rect.bottom().min(current.height());

    for y in rect.y..y_end {
        let row = usize::from(y) * width;
        for x in rect.x..x_end {
            let idx = row + usize::from(x);
            let cell = &next.cells()[idx];
            if current.cells()[idx] == *cell || cell.is_wide_continuation() {
                continue;
            }
            result.cells_changed += 1;

            if state.cursor != Some((x, y)) {
                move_cursor(output, x, y);
                result.cursor_moves += 1;
            }
            result.color_changes += state.pen.apply(cell, output);
            put_char(output, cell.ch());
            state.cursor = Some((x + u16::from(cell.display_width().max(1)), y));
        }
    }
}

/// Position the cursor at 0-based (x, y), using the shortest form.
#[inline]
fn move_cursor(output: &mut Vec<u8>, x: u16, y: u16) {
    let (row, col) = (u32::from(y) + 1, u32::from(x) + 1);
    match (row, col) {
        (1, 1) => output.extend_from_slice(b"\x1b[H"),
        (row, 1) => {
            let _ = write!(output, "\x1b[{row}H");
        }
        (row, col) => {
            let _ = write!(output, "\x1b[{row};{col}H");
        }
    }
}

#[inline]
fn put_char(output: &mut Vec<u8>, ch: char) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
}

/// Write every cell of `buffer`, top-left first.
///
/// Used for the first frame and after a resize, when nothing about the
/// terminal is known. Leaves attributes reset.
pub fn render_full(buffer: &Buffer, output: &mut Vec<u8>) {
    output.extend_from_slice(b"\x1b[?25l\x1b[H");

    let mut pen = Pen::default();
    for (y, row) in buffer.rows().enumerate() {
        if y > 0 {
            output.extend_from_slice(b"\r\n");
        }
        for cell in row.iter().filter(|c| !c.is_wide_continuation()) {
            pen.apply(cell, output);
            put_char(output, cell.ch());
        }
    }

    output.extend_from_slice(RESET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;

    #[test]
    fn test_identical_frames_write_nothing() {
        let a = Buffer::new(10, 5);
        let mut output = Vec::new();
        let result = render_diff(&a, &a.clone(), &[], &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_pixel_row_shares_colours() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        let (top, bottom) = (Rgb::new(40, 160, 90), Rgb::new(10, 20, 30));
        for x in 2..6 {
            b.set(x, 1, Cell::pixels(top, bottom));
        }

        let mut output = Vec::new();
        let result = render_diff(&a, &b, &[], &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 4);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(result.color_changes, 2);
        let text = String::from_utf8_lossy(&output);
        assert!(text.starts_with("\x1b[2;3H"));
        assert_eq!(text.matches(Cell::HALF_BLOCK).count(), 4);
    }

    #[test]
    fn test_cursor_is_remembered_across_diffs() {
        let a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        b.set(0, 0, Cell::new('z'));
        let mut state = DiffState::new();
        let mut output = Vec::new();
        render_diff(&a, &b, &[], &mut output, &mut state);

        let mut c = b.clone();
        c.set(1, 0, Cell::new('Z'));
        output.clear();
        let result = render_diff(&b, &c, &[], &mut output, &mut state);
        assert_eq!(result.cursor_moves, 0);
        assert_eq!(output, b"Z");

        state.reset();
        output.clear();
        let result = render_diff(&b, &c, &[], &mut output, &mut state);
        assert_eq!(result.cursor_moves, 1);
    }

    #[test]
    fn test_dirty_rect_limits_comparison() {
        let a = Buffer::new(20, 10);
        let mut b = Buffer::new(20, 10);
        b.set(0, 0, Cell::new('X'));
        b.set(10, 5, Cell::new('Y'));

        let mut output = Vec::new();
        let dirty = [Rect::new(8, 4, 5, 3)];
        let result = render_diff(&a, &b, &dirty, &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 1);
        assert!(!String::from_utf8_lossy(&output).contains('X'));
    }

    #[test]
    fn test_dropping_bold_resets() {
        let a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        b.set(1, 0, Cell::new('B'));

        let mut state = DiffState::new();
        state.pen.modifiers = Modifiers::BOLD;
        let mut output = Vec::new();
        render_diff(&a, &b, &[], &mut output, &mut state);

        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("\x1b[0m"));
        assert!(text.ends_with('B'));
        assert_eq!(state.pen.modifiers, Modifiers::empty());
    }

    #[test]
    fn test_move_cursor_forms() {
        let mut output = Vec::new();
        move_cursor(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        move_cursor(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        move_cursor(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_render_full() {
        let mut buffer = Buffer::new(4, 2);
        let style = Style::new(Rgb::WHITE, Rgb::BLACK).with_modifiers(Modifiers::DIM);
        buffer.draw_text(0, 0, "zzz", style);
        buffer.set(0, 1, Cell::pixels(Rgb::WHITE, Rgb::BLACK));

        let mut output = Vec::new();
        render_full(&buffer, &mut output);

        let text = String::from_utf8_lossy(&output);
        assert!(text.starts_with("\x1b[?25l\x1b[H"));
        assert!(text.contains("\x1b[2mzzz"));
        assert!(text.contains("\r\n"));
        assert!(text.ends_with("\x1b[0m"));
    }
}
