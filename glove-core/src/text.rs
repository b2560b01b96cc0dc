//! Character-wrapped text layout.
//!
//! Text is laid out one byte at a time on a fixed-size surface. A glyph that
//! would cross the right edge moves to the start of the next line; a line
//! that would cross the bottom edge clears the surface and restarts at the
//! origin. Wrapping is per character, never per word.

use glove_proto::gatt::MAX_WRITE_LEN;
use heapless::Vec;

/// Drawing target for [`render`].
///
/// Coordinates are pixels with the origin at the top-left corner. Glyph
/// metrics are for the currently active font scale.
pub trait TextSurface {
    /// Advance width of `glyph` in pixels.
    fn glyph_width(&self, glyph: u8) -> i32;
    /// Line height in pixels.
    fn glyph_height(&self) -> i32;
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Draw `glyph` with its top-left corner at `(x, y)`.
    fn draw_glyph(&mut self, glyph: u8, x: i32, y: i32);
    /// Blank the whole surface.
    fn clear(&mut self);
}

/// Lay out `text` starting at `(origin_x, origin_y)`.
///
/// Rendering stops at the first NUL byte.
///
/// # Example
///
/// ```
/// use glove_core::{render, TextSurface};
///
/// struct Grid { drawn: [(u8, i32, i32); 4], n: usize }
///
/// impl TextSurface for Grid {
///     fn glyph_width(&self, _: u8) -> i32 { 10 }
///     fn glyph_height(&self) -> i32 { 8 }
///     fn width(&self) -> i32 { 35 }
///     fn height(&self) -> i32 { 100 }
///     fn draw_glyph(&mut self, g: u8, x: i32, y: i32) {
///         self.drawn[self.n] = (g, x, y);
///         self.n += 1;
///     }
///     fn clear(&mut self) {}
/// }
///
/// let mut grid = Grid { drawn: [(0, 0, 0); 4], n: 0 };
/// render(&mut grid, b"AAAA", 0, 0);
/// assert_eq!(grid.drawn[2], (b'A', 20, 0));
/// assert_eq!(grid.drawn[3], (b'A', 0, 8));
/// ```
pub fn render<S: TextSurface + ?Sized>(surface: &mut S, text: &[u8], origin_x: i32, origin_y: i32) {
    let width = surface.width();
    let height = surface.height();
    let line = surface.glyph_height();
    let mut cx = origin_x;
    let mut cy = origin_y;

    for &glyph in text.iter().take_while(|&&b| b != 0) {
        let advance = surface.glyph_width(glyph);
        if cx + advance > width {
            cx = origin_x;
            cy += line;
        }
        if cy + line > height {
            cy = origin_y;
            surface.clear();
        }
        surface.draw_glyph(glyph, cx, cy);
        cx += advance;
    }
}

/// Text magnification of the built-in font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontScale {
    #[default]
    Small = 1,
    Large = 2,
}

impl FontScale {
    /// The other scale.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Small => Self::Large,
            Self::Large => Self::Small,
        }
    }

    /// Integer magnification factor.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> u8 {
        self as u8
    }
}

/// Last message received from the central, with the scale it is shown at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMessage {
    text: Vec<u8, MAX_WRITE_LEN>,
    scale: FontScale,
}

impl DisplayMessage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: Vec::new(),
            scale: FontScale::Small,
        }
    }

    /// Replace the stored text, keeping the current scale.
    ///
    /// The text is cut at the first NUL byte and at the buffer capacity.
    pub fn replace(&mut self, bytes: &[u8]) {
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes.len())
            .min(MAX_WRITE_LEN);
        self.text.clear();
        // Cannot fail: `end` is bounded by the capacity.
        let _ = self.text.extend_from_slice(&bytes[..end]);
    }

    /// Switch between the small and large font. Returns the new scale.
    pub fn toggle_scale(&mut self) -> FontScale {
        self.scale = self.scale.toggle();
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    #[must_use]
    pub const fn scale(&self) -> FontScale {
        self.scale
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayMessage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DisplayMessage {{ text: {=[u8]:a}, scale: {} }}",
            self.text.as_slice(),
            self.scale
        )
    }
}
