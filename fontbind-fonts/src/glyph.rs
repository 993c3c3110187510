//! Glyph load results.

use crate::bitmap::{Bitmap, RgbaImage};
use crate::constants::GlyphFormat;

/// A 2D displacement in 26.6 (or font units for unscaled loads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    pub x: i64,
    pub y: i64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Vector { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Per-glyph metrics in 26.6 (font units when loaded with `NO_SCALE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    pub width: i64,
    pub height: i64,
    pub hori_bearing_x: i64,
    pub hori_bearing_y: i64,
    pub hori_advance: i64,
    pub vert_bearing_x: i64,
    pub vert_bearing_y: i64,
    pub vert_advance: i64,
}

/// What the rasterizer hands back for one loaded glyph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphSlot {
    pub glyph_index: u32,
    /// Unhinted horizontal advance, 16.16.
    pub linear_hori_advance: i64,
    /// Unhinted vertical advance, 16.16.
    pub linear_vert_advance: i64,
    /// Transformed, hinted advance, 26.6.
    pub advance: Vector,
    pub metrics: GlyphMetrics,
    pub format: GlyphFormat,
    /// Rendered image; empty when nothing was rendered.
    pub bitmap: Bitmap,
    /// Offset from the pen position to the bitmap's left edge, in pixels.
    pub bitmap_left: i32,
    /// Offset from the baseline to the bitmap's top row, in pixels (y up).
    pub bitmap_top: i32,
}

/// A glyph loaded for one character code.
///
/// `bitmap` is present only when rendering was requested and the glyph has
/// visible ink; whitespace glyphs never carry one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphResult {
    pub char_code: u32,
    pub glyph_index: u32,
    pub linear_hori_advance: i64,
    pub linear_vert_advance: i64,
    pub advance: Vector,
    pub metrics: GlyphMetrics,
    pub format: GlyphFormat,
    pub bitmap: Option<Bitmap>,
    pub bitmap_left: i32,
    pub bitmap_top: i32,
}

impl GlyphResult {
    /// Package a rasterizer slot for `char_code`, dropping an empty bitmap.
    pub fn from_slot(char_code: u32, slot: GlyphSlot) -> Self {
        let bitmap = if slot.bitmap.is_empty() {
            None
        } else {
            Some(slot.bitmap)
        };
        GlyphResult {
            char_code,
            glyph_index: slot.glyph_index,
            linear_hori_advance: slot.linear_hori_advance,
            linear_vert_advance: slot.linear_vert_advance,
            advance: slot.advance,
            metrics: slot.metrics,
            format: slot.format,
            bitmap,
            bitmap_left: slot.bitmap_left,
            bitmap_top: slot.bitmap_top,
        }
    }

    /// Convert the rendered bitmap to RGBA, if there is one and its pixel mode
    /// is supported.
    pub fn to_rgba(&self) -> Option<RgbaImage> {
        self.bitmap.as_ref().and_then(Bitmap::to_rgba)
    }
}
