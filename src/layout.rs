//! Single-line text layout and compositing.
//!
//! Glyphs are placed left to right on a shared baseline. The pen advances by
//! each glyph's hinted advance plus the kerning between consecutive glyph
//! indices, all in 26.6. Rendered glyph bitmaps are then alpha-composited into
//! one RGBA canvas with a transparent margin.

use std::path::Path;

use anyhow::{Context, Result};
use fontbind_fonts::fixed::{pix_ceil, pix_floor, to_pixels};
use fontbind_fonts::{GlyphResult, SizeMetrics, Vector};

/// A glyph positioned in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph<'a> {
    pub glyph: &'a GlyphResult,
    /// Canvas column of the bitmap's left edge.
    pub x: i64,
    /// Canvas row of the bitmap's top edge.
    pub y: i64,
}

/// The result of laying out one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout<'a> {
    pub width: u32,
    pub height: u32,
    /// Canvas row of the baseline.
    pub baseline: i64,
    /// Final pen position, 26.6 relative to the line start.
    pub pen: i64,
    pub glyphs: Vec<PlacedGlyph<'a>>,
}

/// Place `glyphs` on one line.
///
/// `kerning` receives the glyph indices of each consecutive pair and returns
/// the adjustment in 26.6. The canvas covers the line box (ascender to
/// descender, pen start to pen end) and every glyph bitmap, plus `padding` on
/// each side.
pub fn layout_line<'a, K>(
    glyphs: &'a [GlyphResult],
    size: &SizeMetrics,
    padding: u32,
    mut kerning: K,
) -> LineLayout<'a>
where
    K: FnMut(u32, u32) -> Vector,
{
    let ascent = pix_ceil(size.ascender) >> 6;
    let descent = -(pix_floor(size.descender) >> 6);

    // Positions relative to (line start, baseline), y down.
    let mut pen = 0i64;
    let mut placed = Vec::with_capacity(glyphs.len());
    let (mut min_x, mut min_y) = (0i64, -ascent);
    let (mut max_x, mut max_y) = (0i64, descent);
    let mut previous: Option<u32> = None;

    for glyph in glyphs {
        if let Some(left) = previous {
            pen += kerning(left, glyph.glyph_index).x;
        }
        previous = Some(glyph.glyph_index);

        let x = to_pixels(pen) + i64::from(glyph.bitmap_left);
        let y = -i64::from(glyph.bitmap_top);
        if let Some(bitmap) = &glyph.bitmap {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x + i64::from(bitmap.width));
            max_y = max_y.max(y + i64::from(bitmap.rows));
        }
        placed.push(PlacedGlyph { glyph, x, y });
        pen += glyph.advance.x;
    }
    max_x = max_x.max(to_pixels(pen));

    let padding = i64::from(padding);
    let (dx, dy) = (padding - min_x, padding - min_y);
    for glyph in &mut placed {
        glyph.x += dx;
        glyph.y += dy;
    }

    LineLayout {
        width: clamp_dimension(max_x - min_x + 2 * padding),
        height: clamp_dimension(max_y - min_y + 2 * padding),
        baseline: dy,
        pen,
        glyphs: placed,
    }
}

fn clamp_dimension(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Composite every rendered glyph of `layout` onto a transparent canvas.
///
/// Glyph images are straight alpha and are blended with the "over" operator;
/// glyphs without a convertible bitmap contribute nothing.
pub fn composite(layout: &LineLayout<'_>) -> image::RgbaImage {
    let mut canvas = image::RgbaImage::new(layout.width, layout.height);
    for placed in &layout.glyphs {
        let Some(rgba) = placed.glyph.to_rgba() else {
            continue;
        };
        for row in 0..rgba.height {
            for col in 0..rgba.width {
                let cx = placed.x + i64::from(col);
                let cy = placed.y + i64::from(row);
                let (Ok(cx), Ok(cy)) = (u32::try_from(cx), u32::try_from(cy)) else {
                    continue;
                };
                if cx >= canvas.width() || cy >= canvas.height() {
                    continue;
                }
                let idx = ((row * rgba.width + col) * 4) as usize;
                let Some(src) = rgba.data.get(idx..idx + 4) else {
                    continue;
                };
                let dst = canvas.get_pixel_mut(cx, cy);
                dst.0 = blend_over([src[0], src[1], src[2], src[3]], dst.0);
            }
        }
    }
    canvas
}

/// Straight-alpha "over": `src` on top of `dst`.
pub fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    // Destination weight, scaled by 255.
    let dw = da * (255 - sa) / 255;
    let out_a = sa + dw;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let channel =
        |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * dw + out_a / 2) / out_a) as u8;
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        out_a as u8,
    ]
}

/// Render the canvas as text, one line per row: `#` where the alpha reaches
/// `threshold`, `.` elsewhere.
pub fn to_ascii(canvas: &image::RgbaImage, threshold: u8) -> String {
    let mut out = String::with_capacity(((canvas.width() + 1) * canvas.height()) as usize);
    for row in canvas.rows() {
        out.extend(row.map(|pixel| if pixel.0[3] >= threshold { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

/// Write the canvas as a PNG file.
pub fn save_png(canvas: &image::RgbaImage, path: &Path) -> Result<()> {
    canvas
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    log::info!(
        "Wrote {}x{} image to {}",
        canvas.width(),
        canvas.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_over_transparent_destination() {
        assert_eq!(blend_over([0, 0, 0, 128], [0, 0, 0, 0]), [0, 0, 0, 128]);
    }

    #[test]
    fn test_blend_over_accumulates_alpha() {
        // 128 over 128: 128 + 128 * 127 / 255 = 191
        assert_eq!(blend_over([0, 0, 0, 128], [0, 0, 0, 128]), [0, 0, 0, 191]);
    }

    #[test]
    fn test_blend_over_opaque_source_replaces() {
        assert_eq!(
            blend_over([10, 20, 30, 255], [200, 200, 200, 255]),
            [10, 20, 30, 255]
        );
    }

    #[test]
    fn test_blend_over_fully_transparent() {
        assert_eq!(blend_over([9, 9, 9, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
    }
}
