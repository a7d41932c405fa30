//! Frame: an RGB pixel grid, and the cover-fit crop that maps a clip onto
//! the viewport.
//!
//! Clips render into frames at their intrinsic size. Showing one in the
//! viewport (live, or frozen by the freeze-frame compositor) means picking
//! the crop that fills the viewport while preserving aspect ratio, then
//! scaling it with nearest-neighbour sampling.

use super::{Buffer, Cell, Rgb};
use crate::layout::Rect;

/// Source rectangle in pixel space, fractional like a canvas `drawImage`
/// source rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Crop of a `intrinsic`-sized source that covers a `viewport`-sized target.
///
/// A source wider than the viewport keeps its full height and is cropped to
/// a horizontally centred strip; otherwise it keeps its full width and is
/// cropped to a vertically centred band. Returns `None` when either size
/// has a zero dimension.
pub fn cover_crop(intrinsic: (u32, u32), viewport: (u32, u32)) -> Option<CropRect> {
    let (iw, ih) = intrinsic;
    let (vw, vh) = viewport;
    if iw == 0 || ih == 0 || vw == 0 || vh == 0 {
        return None;
    }

    let (iw, ih) = (f64::from(iw), f64::from(ih));
    let video_aspect = iw / ih;
    let view_aspect = f64::from(vw) / f64::from(vh);

    let crop = if video_aspect > view_aspect {
        let width = ih * view_aspect;
        CropRect {
            x: (iw - width) / 2.0,
            y: 0.0,
            width,
            height: ih,
        }
    } else {
        let height = iw / view_aspect;
        CropRect {
            x: 0.0,
            y: (ih - height) / 2.0,
            width: iw,
            height,
        }
    };
    Some(crop)
}

/// A row-major grid of RGB pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<Rgb>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Create a black frame.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Create a frame filled with `color`.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "Frame dimensions must be non-zero");
        Self {
            pixels: vec![color; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw pixel slice (row-major).
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    /// Pixel at (x, y), if in bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Returns `false` when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Fill every pixel.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Reallocate to a new size; contents become black.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.size() {
            return;
        }
        *self = Self::new(width, height);
    }

    /// Fill an axis-aligned rectangle, clipped to the frame. Coordinates may
    /// be negative.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.width as i32);
        let y1 = y.saturating_add(height).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px as u32, py as u32, color);
            }
        }
    }

    /// Fill an ellipse centred at (cx, cy) with radii (rx, ry).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgb) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let y0 = (cy - ry).floor().max(0.0) as u32;
        let y1 = ((cy + ry).ceil().max(0.0) as u32).min(self.height);
        let x0 = (cx - rx).floor().max(0.0) as u32;
        let x1 = ((cx + rx).ceil().max(0.0) as u32).min(self.width);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.set(px, py, color);
                }
            }
        }
    }

    /// Scale the `crop` region of `src` onto this whole frame using
    /// nearest-neighbour sampling (no smoothing).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn blit_crop_nearest(&mut self, src: &Self, crop: CropRect) {
        let sx_scale = crop.width / f64::from(self.width);
        let sy_scale = crop.height / f64::from(self.height);
        let max_x = f64::from(src.width - 1);
        let max_y = f64::from(src.height - 1);

        let columns: Vec<u32> = (0..self.width)
            .map(|dx| (crop.x + (f64::from(dx) + 0.5) * sx_scale).floor().clamp(0.0, max_x) as u32)
            .collect();

        for dy in 0..self.height {
            let sy = (crop.y + (f64::from(dy) + 0.5) * sy_scale).floor().clamp(0.0, max_y) as u32;
            let src_row = (sy as usize) * (src.width as usize);
            let dst_row = (dy as usize) * (self.width as usize);
            for (dx, &sx) in columns.iter().enumerate() {
                self.pixels[dst_row + dx] = src.pixels[src_row + sx as usize];
            }
        }
    }

    /// Paint into `rect` of a cell buffer, two pixel rows per cell.
    ///
    /// Pixel (x, 2y) becomes the foreground and (x, 2y+1) the background of
    /// cell (rect.x + x, rect.y + y). Pixels outside the frame are black.
    pub fn paint_half_blocks(&self, buffer: &mut Buffer, rect: Rect) {
        for row in 0..rect.height {
            let top_y = u32::from(row) * 2;
            for col in 0..rect.width {
                let x = u32::from(col);
                let top = self.get(x, top_y).unwrap_or(Rgb::BLACK);
                let bottom = self.get(x, top_y + 1).unwrap_or(Rgb::BLACK);
                buffer.set(rect.x + col, rect.y + row, Cell::pixels(top, bottom));
            }
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
