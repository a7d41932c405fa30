//! Cell: one terminal position, and the shared `Rgb` colour.
//!
//! Pet frames are drawn with the upper half block glyph, so a cell carries
//! two pixels: the foreground colour is the top pixel and the background
//! colour the bottom one. Status text uses ordinary characters with a
//! [`Style`].

use bitflags::bitflags;

/// 24-bit colour.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Colour from channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour from `0xRRGGBB`.
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Linear blend towards `other`; `t` is clamped to `0.0..=1.0`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Text attributes used on the status line and notices.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b01;
        /// Dim/faint text
        const DIM = 0b10;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Colours and attributes for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    /// Glyph colour.
    pub fg: Rgb,
    /// Cell colour.
    pub bg: Rgb,
    /// Attributes.
    pub modifiers: Modifiers,
}

impl Style {
    /// Plain text in `fg` on `bg`.
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// The same colours with `modifiers`.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// `'\0'` for the trailing half of a wide glyph.
    ch: char,
    /// 0 for a continuation, otherwise 1 or 2.
    display_width: u8,
    fg: Rgb,
    bg: Rgb,
    modifiers: Modifiers,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

impl Cell {
    /// Upper half block, used to draw two pixels per cell.
    pub const HALF_BLOCK: char = '\u{2580}';

    /// A blank: white on black space.
    pub const EMPTY: Self = Self {
        ch: ' ',
        display_width: 1,
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
        modifiers: Modifiers::empty(),
    };

    /// `c` in the default colours.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(c: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0).min(2) as u8;
        Self {
            ch: c,
            display_width: width,
            ..Self::EMPTY
        }
    }

    /// `c` in `style`.
    #[inline]
    pub fn styled(c: char, style: Style) -> Self {
        Self {
            fg: style.fg,
            bg: style.bg,
            modifiers: style.modifiers,
            ..Self::new(c)
        }
    }

    /// A half-block cell showing `top` over `bottom`.
    #[inline]
    pub const fn pixels(top: Rgb, bottom: Rgb) -> Self {
        Self {
            ch: Self::HALF_BLOCK,
            display_width: 1,
            fg: top,
            bg: bottom,
            modifiers: Modifiers::empty(),
        }
    }

    /// Placeholder for the column a wide glyph spills into.
    #[inline]
    pub const fn wide_continuation() -> Self {
        Self {
            ch: '\0',
            display_width: 0,
            ..Self::EMPTY
        }
    }

    /// Builder: set the foreground colour.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Builder: set the background colour.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// The displayed character.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// Foreground (top pixel for half blocks).
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.fg
    }

    /// Background (bottom pixel for half blocks).
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.bg
    }

    /// Text attributes.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Columns taken.
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.display_width
    }

    /// Whether this cell is the trailing half of a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.display_width == 0
    }
}
