//! Shared integration test helpers for fontbind-fonts.
//!
//! There are no font binaries in the repository, so the suites drive
//! [`FontLibrary`] through [`FakeRasterizer`], a rasterizer over a tiny text
//! container format:
//!
//! ```text
//! FAKEFONT
//! Family;Style;opts;codes
//! ```
//!
//! One line per face. `opts` is a comma list of `kerning` (sets the kerning
//! face flag) and `broken` (the face fails to open). `codes` is a comma list of
//! decimal character codes; a `!` suffix makes loading that code fail and a
//! `~` suffix makes it a blank (no ink) glyph.
//!
//! Every face has two charmaps: index 0 is Apple Roman covering codes below
//! 128, index 1 is Unicode covering all codes (active on open).

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use fontbind_fonts::bitmap::pack_mono;
use fontbind_fonts::raster::sfnt;
use fontbind_fonts::{
    Bitmap, CharmapInfo, Encoding, FaceFlags, FaceInfo, FontBuffer, FontLibrary, GlyphFormat,
    GlyphMetrics, GlyphSlot, KerningMode, LoadFlags, PixelMode, RasterError, RasterFace,
    Rasterizer, SizeMetrics, Vector,
};

/// Counters shared between a rasterizer and every face it opened.
#[derive(Debug, Default)]
pub struct Counters {
    pub inits: Cell<usize>,
    pub shutdowns: Cell<usize>,
    pub opened: Cell<usize>,
    pub closed: Cell<usize>,
    pub loads: Cell<usize>,
}

impl Counters {
    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct FakeRasterizer {
    pub counters: Rc<Counters>,
}

impl FakeRasterizer {
    pub fn new() -> (Self, Rc<Counters>) {
        let counters = Rc::new(Counters::default());
        (
            FakeRasterizer {
                counters: Rc::clone(&counters),
            },
            counters,
        )
    }
}

#[derive(Debug, Clone)]
struct FaceSpec {
    family: String,
    style: String,
    kerning: bool,
    broken: bool,
    /// `(code, fails, blank)`, sorted by code.
    codes: Vec<(u32, bool, bool)>,
}

fn parse_container(bytes: &[u8]) -> Result<Vec<FaceSpec>, RasterError> {
    let text = std::str::from_utf8(bytes).map_err(|_| RasterError::UnknownFormat)?;
    let mut lines = text.lines();
    if lines.next() != Some("FAKEFONT") {
        return Err(RasterError::UnknownFormat);
    }
    let mut faces = Vec::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let parts: Vec<&str> = line.split(';').collect();
        if parts.len() != 4 {
            return Err(RasterError::UnknownFormat);
        }
        let opts: Vec<&str> = parts[2].split(',').map(str::trim).collect();
        let mut codes: Vec<(u32, bool, bool)> = parts[3]
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| {
                let fails = c.ends_with('!');
                let blank = c.ends_with('~');
                let digits = c.trim_end_matches(['!', '~']);
                digits
                    .parse::<u32>()
                    .map(|code| (code, fails, blank))
                    .map_err(|_| RasterError::UnknownFormat)
            })
            .collect::<Result<_, _>>()?;
        codes.sort_by_key(|&(code, _, _)| code);
        faces.push(FaceSpec {
            family: parts[0].to_string(),
            style: parts[1].to_string(),
            kerning: opts.contains(&"kerning"),
            broken: opts.contains(&"broken"),
            codes,
        });
    }
    if faces.is_empty() {
        return Err(RasterError::UnknownFormat);
    }
    Ok(faces)
}

impl Rasterizer for FakeRasterizer {
    type Face = FakeFace;

    fn init(&mut self) -> Result<(), RasterError> {
        Counters::bump(&self.counters.inits);
        Ok(())
    }

    fn shutdown(&mut self) {
        Counters::bump(&self.counters.shutdowns);
    }

    fn face_count(&self, bytes: &[u8]) -> Result<u32, RasterError> {
        Ok(parse_container(bytes)?.len() as u32)
    }

    fn open_face(
        &mut self,
        buffer: &Arc<FontBuffer>,
        index: u32,
    ) -> Result<Self::Face, RasterError> {
        let faces = parse_container(buffer.bytes())?;
        let count = faces.len() as u32;
        let spec = faces
            .into_iter()
            .nth(index as usize)
            .ok_or(RasterError::InvalidFaceIndex { index, count })?;
        if spec.broken {
            return Err(RasterError::UnknownFormat);
        }

        let mut face_flags = FaceFlags::SCALABLE | FaceFlags::SFNT | FaceFlags::HORIZONTAL;
        face_flags.set(FaceFlags::KERNING, spec.kerning);
        let charmaps = vec![
            CharmapInfo {
                index: 0,
                encoding: Encoding::AppleRoman,
                platform_id: 1,
                encoding_id: 0,
            },
            CharmapInfo {
                index: 1,
                encoding: Encoding::Unicode,
                platform_id: 3,
                encoding_id: 1,
            },
        ];
        let info = FaceInfo {
            family_name: spec.family.clone(),
            style_name: spec.style.clone(),
            face_index: index,
            num_glyphs: spec.codes.len() as u32 + 1,
            units_per_em: 1000,
            face_flags,
            ascender: 800,
            descender: -200,
            height: 1200,
            max_advance_width: 600,
            charmaps,
            ..Default::default()
        };

        Counters::bump(&self.counters.opened);
        Ok(FakeFace {
            spec,
            info,
            charmap: 1,
            size: None,
            counters: Rc::clone(&self.counters),
        })
    }
}

#[derive(Debug)]
pub struct FakeFace {
    spec: FaceSpec,
    info: FaceInfo,
    charmap: usize,
    size: Option<SizeMetrics>,
    counters: Rc<Counters>,
}

impl FakeFace {
    /// `(code, glyph index, fails, blank)` visible through the active charmap.
    fn mapped(&self) -> impl Iterator<Item = (u32, u32, bool, bool)> + '_ {
        let ascii_only = self.charmap == 0;
        self.spec
            .codes
            .iter()
            .enumerate()
            .filter(move |(_, (code, _, _))| !ascii_only || *code < 128)
            .map(|(i, &(code, fails, blank))| (code, i as u32 + 1, fails, blank))
    }
}

impl Drop for FakeFace {
    fn drop(&mut self) {
        Counters::bump(&self.counters.closed);
    }
}

impl RasterFace for FakeFace {
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
        let x = (width * i64::from(hdpi) + 36) / 72;
        let y = (height * i64::from(vdpi) + 36) / 72;
        if x <= 0 || y <= 0 {
            return Err(RasterError::InvalidPixelSize {
                x_ppem: 0,
                y_ppem: 0,
            });
        }
        let metrics = sfnt::size_metrics(&self.info, x, y);
        self.size = Some(metrics);
        Ok(metrics)
    }

    fn set_pixel_sizes(&mut self, width: u32, height: u32) -> Result<SizeMetrics, RasterError> {
        if width > 4096 || height > 4096 {
            return Err(RasterError::InvalidPixelSize {
                x_ppem: width,
                y_ppem: height,
            });
        }
        let metrics =
            sfnt::size_metrics(&self.info, i64::from(width) * 64, i64::from(height) * 64);
        self.size = Some(metrics);
        Ok(metrics)
    }

    fn set_charmap(&mut self, index: usize) -> Result<CharmapInfo, RasterError> {
        let charmap = *self
            .info
            .charmaps
            .get(index)
            .ok_or(RasterError::InvalidCharmapIndex(index))?;
        self.charmap = index;
        Ok(charmap)
    }

    fn active_charmap(&self) -> Option<CharmapInfo> {
        self.info.charmaps.get(self.charmap).copied()
    }

    fn char_index(&self, code: u32) -> u32 {
        self.mapped()
            .find(|&(c, ..)| c == code)
            .map_or(0, |(_, glyph, ..)| glyph)
    }

    fn first_char(&self) -> (u32, u32) {
        self.mapped()
            .next()
            .map_or((0, 0), |(code, glyph, ..)| (code, glyph))
    }

    fn next_char(&self, code: u32) -> (u32, u32) {
        self.mapped()
            .find(|&(c, ..)| c > code)
            .map_or((0, 0), |(c, glyph, ..)| (c, glyph))
    }

    fn load_char(&mut self, code: u32, flags: LoadFlags) -> Result<GlyphSlot, RasterError> {
        Counters::bump(&self.counters.loads);
        let (_, glyph_index, fails, blank) = self
            .mapped()
            .find(|&(c, ..)| c == code)
            .ok_or(RasterError::MissingGlyph(code))?;
        if fails {
            return Err(RasterError::InvalidGlyphIndex(glyph_index));
        }

        let scaled = !flags.contains(LoadFlags::NO_SCALE);
        let ppem = match (scaled, self.size) {
            (false, _) => 0,
            (true, Some(size)) => i64::from(size.y_ppem),
            (true, None) => return Err(RasterError::NoSize),
        };
        // Glyphs are 600 units wide; at 1000 upem that is 0.6 em.
        let advance = if scaled { ppem * 600 * 64 / 1000 } else { 600 };

        let mut slot = GlyphSlot {
            glyph_index,
            linear_hori_advance: advance << 10,
            advance: Vector::new(advance, 0),
            metrics: GlyphMetrics {
                width: advance,
                height: advance,
                hori_bearing_y: advance,
                hori_advance: advance,
                ..Default::default()
            },
            format: GlyphFormat::Outline,
            ..Default::default()
        };

        if scaled && flags.contains(LoadFlags::RENDER) {
            slot.format = GlyphFormat::Bitmap;
            if !blank {
                let coverage = [255u8, 128, 64, 0];
                slot.bitmap = if flags.contains(LoadFlags::MONOCHROME) {
                    pack_mono(&coverage, 2, 2)
                } else {
                    Bitmap {
                        width: 2,
                        rows: 2,
                        pitch: 2,
                        pixel_mode: PixelMode::Gray,
                        num_grays: 256,
                        buffer: coverage.to_vec(),
                    }
                };
                slot.bitmap_left = 1;
                slot.bitmap_top = 2;
            }
        }
        Ok(slot)
    }

    fn kerning(&self, left: u32, right: u32, mode: KerningMode) -> Result<Vector, RasterError> {
        for index in [left, right] {
            if index == 0 || index >= self.info.num_glyphs {
                return Err(RasterError::InvalidGlyphIndex(index));
            }
        }
        // Every pair kerns by -50 units.
        match mode {
            KerningMode::Unscaled => Ok(Vector::new(-50, 0)),
            _ => {
                let size = self.size.ok_or(RasterError::NoSize)?;
                Ok(Vector::new(-50 * 64 * i64::from(size.x_ppem) / 1000, 0))
            }
        }
    }
}

/// Build a container from face lines.
pub fn container(lines: &[&str]) -> Vec<u8> {
    let mut text = String::from("FAKEFONT\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.into_bytes()
}

/// A library with a fresh fake rasterizer.
pub fn library() -> (FontLibrary<FakeRasterizer>, Rc<Counters>) {
    let (rasterizer, counters) = FakeRasterizer::new();
    (FontLibrary::new(rasterizer), counters)
}

/// Printable ASCII `A`..`E` plus a blank space.
pub const BASIC_CODES: &str = "32~,65,66,67,68,69";
