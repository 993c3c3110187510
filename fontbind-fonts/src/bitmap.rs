//! Rasterized glyph bitmaps and their conversion to straight-alpha RGBA.
//!
//! Only the two coverage formats are converted:
//! - 8-bit gray with a 256-level ramp: each sample becomes the alpha of one
//!   pixel, RGB stays zero so the caller can tint by compositing.
//! - 1-bit mono: bits are read MSB-first and expand to alpha 0 or 255.
//!
//! Every other pixel mode yields no image. The stride is `|pitch|`; a negative
//! pitch (bottom-up storage) is accepted but rows are not reordered.

use crate::constants::PixelMode;

/// A rendered glyph bitmap as produced by the rasterizer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Number of rows.
    pub rows: u32,
    /// Bytes per row; negative for bottom-up storage.
    pub pitch: i32,
    /// Sample layout.
    pub pixel_mode: PixelMode,
    /// Number of gray levels (256 for 8-bit gray, 2 for mono).
    pub num_grays: u16,
    /// Raw samples, `rows * |pitch|` bytes.
    pub buffer: Vec<u8>,
}

/// Straight-alpha RGBA pixels, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Colour space of the samples.
    pub const COLOR_SPACE: &'static str = "srgb";

    /// Alpha channel of the pixel at `(x, y)`.
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4 + 3) as usize;
        self.data.get(idx).copied()
    }
}

impl Bitmap {
    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.pitch.unsigned_abs() as usize
    }

    /// Size of the sample buffer implied by the dimensions.
    pub fn buffer_size(&self) -> usize {
        self.rows as usize * self.stride()
    }

    /// True when there is no image data at all (whitespace glyphs, outline-only
    /// loads).
    pub fn is_empty(&self) -> bool {
        self.buffer_size() == 0
    }

    /// Convert to straight-alpha RGBA.
    ///
    /// Returns `None` for an empty bitmap, an unsupported pixel mode, or a
    /// sample buffer shorter than its dimensions claim.
    pub fn to_rgba(&self) -> Option<RgbaImage> {
        let buffer_size = self.buffer_size();
        if buffer_size == 0 {
            return None;
        }
        if self.buffer.len() < buffer_size {
            log::warn!(
                "Bitmap buffer holds {} bytes but {}x{} with pitch {} needs {}",
                self.buffer.len(),
                self.width,
                self.rows,
                self.pitch,
                buffer_size
            );
            return None;
        }

        let width = self.width as usize;
        let height = self.rows as usize;
        let stride = self.stride();

        let data = match self.pixel_mode {
            PixelMode::Gray if self.num_grays == 256 => {
                if stride < width {
                    return None;
                }
                gray_to_rgba(&self.buffer, width, height, stride)
            }
            PixelMode::Mono => {
                if stride < width.div_ceil(8) {
                    return None;
                }
                mono_to_rgba(&self.buffer, width, height, stride)
            }
            other => {
                log::debug!("Pixel mode {:?} is not converted to RGBA", other);
                return None;
            }
        };

        Some(RgbaImage {
            width: self.width,
            height: self.rows,
            data,
        })
    }
}

fn gray_to_rgba(buffer: &[u8], width: usize, height: usize, stride: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    for y in 0..height {
        let row = &buffer[y * stride..y * stride + width];
        for (x, &coverage) in row.iter().enumerate() {
            rgba[(y * width + x) * 4 + 3] = coverage;
        }
    }
    rgba
}

fn mono_to_rgba(buffer: &[u8], width: usize, height: usize, stride: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    let mut nth_pixel = 0;
    for y in 0..height {
        for x in 0..width {
            let byte = buffer[y * stride + x / 8];
            let bit = (byte >> (7 - (x % 8))) & 1;
            rgba[nth_pixel * 4 + 3] = 255 * bit;
            nth_pixel += 1;
        }
    }
    rgba
}

/// Pack 8-bit coverage into a 1-bit MSB-first bitmap, setting a bit when the
/// coverage is at least half.
pub fn pack_mono(coverage: &[u8], width: u32, rows: u32) -> Bitmap {
    let width_px = width as usize;
    let pitch = width_px.div_ceil(8);
    let mut buffer = vec![0u8; pitch * rows as usize];
    for y in 0..rows as usize {
        for x in 0..width_px {
            if coverage.get(y * width_px + x).copied().unwrap_or(0) >= 128 {
                buffer[y * pitch + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    Bitmap {
        width,
        rows,
        pitch: pitch as i32,
        pixel_mode: PixelMode::Mono,
        num_grays: 2,
        buffer,
    }
}
