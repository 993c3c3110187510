//! Production rasterizer built on `swash` (scaling and rendering) and
//! `ttf-parser` (tables, charmaps, kerning).
//!
//! Faces keep a share of the file bytes and re-borrow them per operation, so
//! no self-referential font handles are stored.

use std::sync::Arc;

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;
use ttf_parser::GlyphId;

use super::{RasterError, RasterFace, Rasterizer, sfnt};
use crate::bitmap::{Bitmap, pack_mono};
use crate::buffer::FontBuffer;
use crate::constants::{Encoding, GlyphFormat, KerningMode, LoadFlags, PixelMode, RenderMode};
use crate::face::{CharmapInfo, FaceInfo, SizeMetrics};
use crate::fixed::{self, ONE_26_6};
use crate::glyph::{GlyphMetrics, GlyphSlot, Vector};

/// Opens SFNT faces (TTF, OTF, TTC, OTC) for rendering through swash.
#[derive(Debug, Default)]
pub struct SwashRasterizer {
    initialized: bool,
}

impl SwashRasterizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for SwashRasterizer {
    type Face = SwashFace;

    fn init(&mut self) -> Result<(), RasterError> {
        if !self.initialized {
            log::debug!("swash rasterizer initialized");
            self.initialized = true;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.initialized {
            log::debug!("swash rasterizer shut down");
            self.initialized = false;
        }
    }

    fn face_count(&self, bytes: &[u8]) -> Result<u32, RasterError> {
        sfnt::face_count(bytes)
    }

    fn open_face(
        &mut self,
        buffer: &Arc<FontBuffer>,
        index: u32,
    ) -> Result<Self::Face, RasterError> {
        let count = sfnt::face_count(buffer.bytes())?;
        if index >= count {
            return Err(RasterError::InvalidFaceIndex { index, count });
        }

        let data = buffer.shared_bytes();
        if swash::FontRef::from_index(&data, index as usize).is_none() {
            return Err(RasterError::UnknownFormat);
        }

        let (info, charmap, codes) = {
            let face = sfnt::parse_face(&data, index)?;
            let info = sfnt::read_face_info(&face, index);
            let charmap = CharmapInfo::find_best(&info.charmaps, Encoding::Unicode).copied();
            let codes = charmap
                .map(|cm| sfnt::mapped_codes(&face, cm.index))
                .unwrap_or_default();
            (info, charmap, codes)
        };

        log::debug!(
            "Opened face {} of {}: {} {} ({} glyphs, {} charmaps)",
            index,
            count,
            info.family_name,
            info.style_name,
            info.num_glyphs,
            info.charmaps.len()
        );

        Ok(SwashFace {
            data,
            index,
            info,
            size: None,
            charmap,
            codes,
            context: ScaleContext::new(),
        })
    }
}

/// Largest ppem a face can be scaled to, in 26.6.
const MAX_PPEM: i64 = u16::MAX as i64 * ONE_26_6;

/// 26.6 points at `dpi` to a 26.6 ppem, rounded. `None` on overflow.
fn points_to_ppem(points: i64, dpi: u32) -> Option<i64> {
    points
        .checked_mul(i64::from(dpi))?
        .checked_add(36)
        .map(|scaled| scaled / 72)
}

fn whole_pixels(ppem: i64) -> u32 {
    u32::try_from(ppem.max(0) >> 6).unwrap_or(u32::MAX)
}

/// One face opened by [`SwashRasterizer`].
pub struct SwashFace {
    data: Arc<[u8]>,
    index: u32,
    info: FaceInfo,
    size: Option<SizeMetrics>,
    charmap: Option<CharmapInfo>,
    /// Mapped `(code, glyph)` pairs of the active charmap, sorted by code.
    codes: Vec<(u32, u32)>,
    context: ScaleContext,
}

impl std::fmt::Debug for SwashFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwashFace")
            .field("index", &self.index)
            .field("family_name", &self.info.family_name)
            .field("style_name", &self.info.style_name)
            .field("size", &self.size)
            .field("charmap", &self.charmap)
            .field("mapped_codes", &self.codes.len())
            .finish()
    }
}

impl SwashFace {
    fn apply_ppem(&mut self, x_ppem: i64, y_ppem: i64) -> Result<SizeMetrics, RasterError> {
        if !(1..=MAX_PPEM).contains(&x_ppem) || !(1..=MAX_PPEM).contains(&y_ppem) {
            return Err(RasterError::InvalidPixelSize {
                x_ppem: whole_pixels(x_ppem),
                y_ppem: whole_pixels(y_ppem),
            });
        }

        let metrics = if self.info.is_scalable() {
            sfnt::size_metrics(&self.info, x_ppem, y_ppem)
        } else {
            // Bitmap-only faces can only be set to one of their strikes.
            let wanted = fixed::pix_round(y_ppem);
            let strike = self
                .info
                .available_sizes
                .iter()
                .find(|strike| fixed::pix_round(strike.y_ppem) == wanted)
                .ok_or(RasterError::InvalidPixelSize {
                    x_ppem: whole_pixels(x_ppem),
                    y_ppem: whole_pixels(y_ppem),
                })?;
            sfnt::size_metrics(&self.info, strike.x_ppem, strike.y_ppem)
        };

        self.size = Some(metrics);
        Ok(metrics)
    }

    fn render(
        &mut self,
        slot: &mut GlyphSlot,
        glyph_id: u16,
        size: &SizeMetrics,
        flags: LoadFlags,
    ) -> Result<(), RasterError> {
        let font = swash::FontRef::from_index(&self.data, self.index as usize)
            .ok_or(RasterError::UnknownFormat)?;

        let mut scaler = self
            .context
            .builder(font)
            .size(f32::from(size.y_ppem))
            .hint(!flags.contains(LoadFlags::NO_HINTING))
            .build();

        let sources = if flags.contains(LoadFlags::COLOR) {
            vec![
                Source::ColorBitmap(StrikeWith::BestFit),
                Source::ColorOutline(0),
                Source::Outline,
            ]
        } else if flags.contains(LoadFlags::NO_BITMAP) {
            vec![Source::Outline]
        } else if self.info.is_scalable() {
            vec![Source::Outline, Source::Bitmap(StrikeWith::BestFit)]
        } else {
            vec![Source::Bitmap(StrikeWith::BestFit), Source::Outline]
        };

        let mode = flags.target_mode();
        let format = match mode {
            RenderMode::Lcd | RenderMode::LcdV => Format::Subpixel,
            _ => Format::Alpha,
        };

        slot.format = GlyphFormat::Bitmap;
        let Some(image) = Render::new(&sources)
            .format(format)
            .render(&mut scaler, glyph_id)
        else {
            // Nothing to draw, e.g. a space.
            return Ok(());
        };

        let width = image.placement.width;
        let rows = image.placement.height;
        slot.bitmap_left = image.placement.left;
        slot.bitmap_top = image.placement.top;
        if width == 0 || rows == 0 {
            return Ok(());
        }

        let monochrome = flags.contains(LoadFlags::MONOCHROME) || mode == RenderMode::Mono;
        slot.bitmap = match image.content {
            Content::Mask if monochrome => pack_mono(&image.data, width, rows),
            Content::Mask => Bitmap {
                width,
                rows,
                pitch: width as i32,
                pixel_mode: PixelMode::Gray,
                num_grays: 256,
                buffer: image.data,
            },
            Content::SubpixelMask => lcd_bitmap(&image.data, width, rows),
            Content::Color => bgra_bitmap(image.data, width, rows),
        };
        Ok(())
    }
}

impl RasterFace for SwashFace {
    fn info(&self) -> &FaceInfo {
        &self.info
    }

    fn set_char_size(
        &mut self,
        width: i64,
        height: i64,
        hdpi: u32,
        vdpi: u32,
    ) -> Result<SizeMetrics, RasterError> {
        let (Some(x_ppem), Some(y_ppem)) =
            (points_to_ppem(width, hdpi), points_to_ppem(height, vdpi))
        else {
            return Err(RasterError::InvalidPixelSize {
                x_ppem: u32::MAX,
                y_ppem: u32::MAX,
            });
        };
        self.apply_ppem(x_ppem, y_ppem)
    }

    fn set_pixel_sizes(&mut self, width: u32, height: u32) -> Result<SizeMetrics, RasterError> {
        self.apply_ppem(i64::from(width) * ONE_26_6, i64::from(height) * ONE_26_6)
    }

    fn set_charmap(&mut self, index: usize) -> Result<CharmapInfo, RasterError> {
        let charmap = *self
            .info
            .charmaps
            .get(index)
            .ok_or(RasterError::InvalidCharmapIndex(index))?;
        let face = sfnt::parse_face(&self.data, self.index)?;
        self.codes = sfnt::mapped_codes(&face, index);
        self.charmap = Some(charmap);
        Ok(charmap)
    }

    fn active_charmap(&self) -> Option<CharmapInfo> {
        self.charmap
    }

    fn char_index(&self, code: u32) -> u32 {
        self.codes
            .binary_search_by_key(&code, |&(c, _)| c)
            .map(|i| self.codes[i].1)
            .unwrap_or(0)
    }

    fn first_char(&self) -> (u32, u32) {
        self.codes.first().copied().unwrap_or((0, 0))
    }

    fn next_char(&self, code: u32) -> (u32, u32) {
        let next = self.codes.partition_point(|&(c, _)| c <= code);
        self.codes.get(next).copied().unwrap_or((0, 0))
    }

    fn load_char(&mut self, code: u32, flags: LoadFlags) -> Result<GlyphSlot, RasterError> {
        let glyph_index = self.char_index(code);
        if glyph_index == 0 {
            return Err(RasterError::MissingGlyph(code));
        }
        let glyph_id = u16::try_from(glyph_index)
            .map_err(|_| RasterError::InvalidGlyphIndex(glyph_index))?;

        let size = if flags.contains(LoadFlags::NO_SCALE) {
            None
        } else {
            Some(self.size.ok_or(RasterError::NoSize)?)
        };

        let design = {
            let face = sfnt::parse_face(&self.data, self.index)?;
            DesignMetrics::read(&face, GlyphId(glyph_id), &self.info)
        };

        let hinted = !flags.contains(LoadFlags::NO_HINTING);
        let metrics = match &size {
            Some(size) => design.scaled(size, hinted),
            None => design.unscaled(),
        };

        let (linear_hori_advance, linear_vert_advance) = match &size {
            Some(size) if !flags.contains(LoadFlags::LINEAR_DESIGN) => (
                linear_advance(design.advance_width, size.x_scale),
                linear_advance(design.advance_height, size.y_scale),
            ),
            _ => (design.advance_width, design.advance_height),
        };

        let advance = if flags.contains(LoadFlags::VERTICAL_LAYOUT) {
            Vector::new(0, metrics.vert_advance)
        } else {
            Vector::new(metrics.hori_advance, 0)
        };

        let mut slot = GlyphSlot {
            glyph_index,
            linear_hori_advance,
            linear_vert_advance,
            advance,
            metrics,
            format: if self.info.is_scalable() {
                GlyphFormat::Outline
            } else {
                GlyphFormat::Bitmap
            },
            ..Default::default()
        };

        if let Some(size) = size
            && flags.contains(LoadFlags::RENDER)
        {
            self.render(&mut slot, glyph_id, &size, flags)?;
        }

        Ok(slot)
    }

    fn kerning(&self, left: u32, right: u32, mode: KerningMode) -> Result<Vector, RasterError> {
        let to_glyph = |index: u32| {
            u16::try_from(index)
                .ok()
                .filter(|_| index < self.info.num_glyphs)
                .map(GlyphId)
                .ok_or(RasterError::InvalidGlyphIndex(index))
        };
        let (left, right) = (to_glyph(left)?, to_glyph(right)?);

        let face = sfnt::parse_face(&self.data, self.index)?;
        let value = sfnt::kern_pair(&face, left, right);

        match mode {
            KerningMode::Unscaled => Ok(Vector::new(value, 0)),
            KerningMode::Unfitted | KerningMode::Default => {
                let size = self.size.ok_or(RasterError::NoSize)?;
                let x = fixed::mul_fix(value, size.x_scale);
                let x = if mode == KerningMode::Default {
                    fixed::pix_round(x)
                } else {
                    x
                };
                Ok(Vector::new(x, 0))
            }
        }
    }
}

/// Unscaled glyph measurements in font units.
#[derive(Debug, Clone, Copy)]
struct DesignMetrics {
    advance_width: i64,
    advance_height: i64,
    x_min: i64,
    y_min: i64,
    x_max: i64,
    y_max: i64,
    top_side_bearing: Option<i64>,
}

impl DesignMetrics {
    fn read(face: &ttf_parser::Face<'_>, glyph: GlyphId, info: &FaceInfo) -> Self {
        let bbox = face.glyph_bounding_box(glyph);
        DesignMetrics {
            advance_width: face.glyph_hor_advance(glyph).map_or(0, i64::from),
            advance_height: face
                .glyph_ver_advance(glyph)
                .map_or(i64::from(info.height), i64::from),
            x_min: bbox.map_or(0, |b| i64::from(b.x_min)),
            y_min: bbox.map_or(0, |b| i64::from(b.y_min)),
            x_max: bbox.map_or(0, |b| i64::from(b.x_max)),
            y_max: bbox.map_or(0, |b| i64::from(b.y_max)),
            top_side_bearing: face.glyph_ver_side_bearing(glyph).map(i64::from),
        }
    }

    fn vert_bearing_x(&self) -> i64 {
        self.x_min - self.advance_width / 2
    }

    fn vert_bearing_y(&self) -> i64 {
        self.top_side_bearing
            .unwrap_or((self.advance_height - (self.y_max - self.y_min)) / 2)
    }

    fn unscaled(&self) -> GlyphMetrics {
        GlyphMetrics {
            width: self.x_max - self.x_min,
            height: self.y_max - self.y_min,
            hori_bearing_x: self.x_min,
            hori_bearing_y: self.y_max,
            hori_advance: self.advance_width,
            vert_bearing_x: self.vert_bearing_x(),
            vert_bearing_y: self.vert_bearing_y(),
            vert_advance: self.advance_height,
        }
    }

    /// Scale to 26.6. Hinted metrics snap the box outward and round the
    /// advances.
    fn scaled(&self, size: &SizeMetrics, hinted: bool) -> GlyphMetrics {
        let sx = |v: i64| fixed::mul_fix(v, size.x_scale);
        let sy = |v: i64| fixed::mul_fix(v, size.y_scale);
        let snap = |v: i64, f: fn(i64) -> i64| if hinted { f(v) } else { v };

        let left = snap(sx(self.x_min), fixed::pix_floor);
        let right = snap(sx(self.x_max), fixed::pix_ceil);
        let top = snap(sy(self.y_max), fixed::pix_ceil);
        let bottom = snap(sy(self.y_min), fixed::pix_floor);

        GlyphMetrics {
            width: right - left,
            height: top - bottom,
            hori_bearing_x: left,
            hori_bearing_y: top,
            hori_advance: snap(sx(self.advance_width), fixed::pix_round),
            vert_bearing_x: snap(sx(self.vert_bearing_x()), fixed::pix_floor),
            vert_bearing_y: snap(sy(self.vert_bearing_y()), fixed::pix_floor),
            vert_advance: snap(sy(self.advance_height), fixed::pix_round),
        }
    }
}

/// Font-unit advance to 16.16 pixels.
fn linear_advance(advance: i64, scale: i64) -> i64 {
    (advance * scale + 32) >> 6
}

/// Pack a swash subpixel mask (3 or 4 bytes per pixel) into an LCD bitmap of
/// three samples per pixel.
fn lcd_bitmap(data: &[u8], width: u32, rows: u32) -> Bitmap {
    let pixels = width as usize * rows as usize;
    let channels = if pixels > 0 { data.len() / pixels } else { 0 };
    let buffer: Vec<u8> = if channels >= 3 {
        data.chunks_exact(channels)
            .flat_map(|px| px[..3].iter().copied())
            .collect()
    } else {
        Vec::new()
    };
    Bitmap {
        width: width * 3,
        rows: if buffer.is_empty() { 0 } else { rows },
        pitch: (width * 3) as i32,
        pixel_mode: PixelMode::Lcd,
        num_grays: 256,
        buffer,
    }
}

/// swash color output is RGBA; the bitmap layout is BGRA.
fn bgra_bitmap(mut data: Vec<u8>, width: u32, rows: u32) -> Bitmap {
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    Bitmap {
        width,
        rows,
        pitch: (width * 4) as i32,
        pixel_mode: PixelMode::Bgra,
        num_grays: 256,
        buffer: data,
    }
}
