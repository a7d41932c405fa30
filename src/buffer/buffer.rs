//! Buffer: the cell grid the stage composes each frame into.
//!
//! Row-major, one contiguous allocation. The stage repaints every cell on
//! every tick, so a resize simply starts from a blank grid.

use super::cell::{Cell, Style};
use crate::layout::Rect;

/// A grid of terminal cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Buffer {
    /// A blank `width` x `height` grid.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        Self {
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole grid as a rectangle at the origin.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Overwrite the cell at (x, y). Returns `false` when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Write `text` from (x, y) in `style`, stopping at the right edge.
    ///
    /// A double-width glyph that would straddle the edge is dropped along
    /// with everything after it. Returns the columns written.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let cell = Cell::styled(ch, style);
            let width = u16::from(cell.display_width());
            if width == 0 {
                continue;
            }
            if col.saturating_add(width) > self.width {
                break;
            }
            self.set(col, y, cell);
            if width == 2 {
                self.set(col + 1, y, Cell::wide_continuation().with_bg(style.bg));
            }
            col += width;
        }
        col - x
    }

    /// Fill the part of `rect` inside the grid with `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        for y in rect.y..y_end {
            let row = usize::from(y) * usize::from(self.width);
            self.cells[row + usize::from(rect.x.min(x_end))..row + usize::from(x_end)].fill(cell);
        }
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        *self = Self::new(width.max(1), height.max(1));
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
