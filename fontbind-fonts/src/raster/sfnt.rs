//! SFNT table access through `ttf-parser`.
//!
//! Face metadata (names, flags, charmaps, strikes), charmap walks, `kern`
//! lookups and the size math used by the swash backend.

use ttf_parser::{GlyphId, PlatformId, Tag, name_id};

use super::RasterError;
use crate::constants::{Encoding, FaceFlags, StyleFlags};
use crate::face::{BBox, BitmapSize, CharmapInfo, FaceInfo, SizeMetrics};
use crate::fixed::{self, ONE_26_6};

/// Parse face `index` of a font file or collection.
pub fn parse_face(data: &[u8], index: u32) -> Result<ttf_parser::Face<'_>, RasterError> {
    Ok(ttf_parser::Face::parse(data, index)?)
}

/// Number of faces in `data`: the collection size for TTC/OTC, 1 for a single
/// face that parses.
pub fn face_count(data: &[u8]) -> Result<u32, RasterError> {
    if let Some(count) = ttf_parser::fonts_in_collection(data) {
        if count == 0 {
            return Err(RasterError::UnknownFormat);
        }
        return Ok(count);
    }
    match ttf_parser::Face::parse(data, 0) {
        Ok(_) => Ok(1),
        Err(ttf_parser::FaceParsingError::UnknownMagic) => Err(RasterError::UnknownFormat),
        Err(err) => Err(err.into()),
    }
}

/// Collect everything [`FaceInfo`] needs from the parsed tables.
pub fn read_face_info(face: &ttf_parser::Face<'_>, index: u32) -> FaceInfo {
    let raw = face.raw_face();
    let rect = face.global_bounding_box();
    let underline = face.underline_metrics();
    let height = face.height();

    let max_advance_width = read_u16_at(raw.table(Tag::from_bytes(b"hhea")), 10)
        .map(|v| v as i16)
        .unwrap_or_else(|| rect.x_max.saturating_sub(rect.x_min));
    let max_advance_height = read_u16_at(raw.table(Tag::from_bytes(b"vhea")), 10)
        .map(|v| v as i16)
        .unwrap_or(height);

    FaceInfo {
        family_name: read_name(face, &[name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY])
            .unwrap_or_else(|| "Unknown".to_string()),
        style_name: read_name(face, &[name_id::TYPOGRAPHIC_SUBFAMILY, name_id::SUBFAMILY])
            .unwrap_or_else(|| "Regular".to_string()),
        face_index: index,
        num_glyphs: u32::from(face.number_of_glyphs()),
        units_per_em: face.units_per_em(),
        face_flags: read_face_flags(face),
        style_flags: read_style_flags(face),
        ascender: face.ascender(),
        descender: face.descender(),
        height,
        bbox: BBox {
            x_min: i64::from(rect.x_min),
            y_min: i64::from(rect.y_min),
            x_max: i64::from(rect.x_max),
            y_max: i64::from(rect.y_max),
        },
        max_advance_width,
        max_advance_height,
        underline_position: underline.map_or(0, |m| m.position),
        underline_thickness: underline.map_or(0, |m| m.thickness),
        charmaps: read_charmaps(face),
        available_sizes: read_strikes(face),
    }
}

fn read_name(face: &ttf_parser::Face<'_>, ids: &[u16]) -> Option<String> {
    ids.iter().find_map(|id| {
        face.names()
            .into_iter()
            .filter(|name| name.name_id == *id)
            .filter_map(|name| name.to_string())
            .find(|text| !text.trim().is_empty())
    })
}

fn has_table(face: &ttf_parser::Face<'_>, tag: &[u8; 4]) -> bool {
    face.raw_face().table(Tag::from_bytes(tag)).is_some()
}

fn read_u16_at(table: Option<&[u8]>, offset: usize) -> Option<u16> {
    let bytes = table?.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_face_flags(face: &ttf_parser::Face<'_>) -> FaceFlags {
    let has_cff = has_table(face, b"CFF ") || has_table(face, b"CFF2");
    let has_bitmaps = has_table(face, b"CBDT")
        || has_table(face, b"EBDT")
        || has_table(face, b"sbix");
    let post_has_names = face
        .raw_face()
        .table(Tag::from_bytes(b"post"))
        .and_then(|post| post.get(..4))
        == Some(&[0, 2, 0, 0][..]);

    let mut flags = FaceFlags::SFNT | FaceFlags::HORIZONTAL;
    flags.set(FaceFlags::SCALABLE, has_table(face, b"glyf") || has_cff);
    flags.set(FaceFlags::FIXED_SIZES, has_bitmaps);
    flags.set(FaceFlags::FIXED_WIDTH, face.is_monospaced());
    flags.set(FaceFlags::VERTICAL, has_table(face, b"vhea"));
    flags.set(FaceFlags::KERNING, has_table(face, b"kern"));
    flags.set(FaceFlags::GLYPH_NAMES, post_has_names || has_cff);
    flags.set(FaceFlags::MULTIPLE_MASTERS, face.is_variable());
    flags.set(
        FaceFlags::COLOR,
        has_table(face, b"COLR")
            || has_table(face, b"CBDT")
            || has_table(face, b"sbix")
            || has_table(face, b"SVG "),
    );
    flags.set(FaceFlags::SVG, has_table(face, b"SVG "));
    flags.set(FaceFlags::SBIX, has_table(face, b"sbix"));
    flags
}

fn read_style_flags(face: &ttf_parser::Face<'_>) -> StyleFlags {
    let mut flags = StyleFlags::default();
    if face.is_italic() {
        flags = flags | StyleFlags::ITALIC;
    }
    if face.is_bold() {
        flags = flags | StyleFlags::BOLD;
    }
    flags
}

fn platform_number(platform: PlatformId) -> u16 {
    match platform {
        PlatformId::Unicode => 0,
        PlatformId::Macintosh => 1,
        PlatformId::Iso => 2,
        PlatformId::Windows => 3,
        PlatformId::Custom => 4,
    }
}

fn read_charmaps(face: &ttf_parser::Face<'_>) -> Vec<CharmapInfo> {
    let Some(cmap) = face.tables().cmap else {
        return Vec::new();
    };
    cmap.subtables
        .into_iter()
        .enumerate()
        .map(|(index, subtable)| {
            let platform_id = platform_number(subtable.platform_id);
            CharmapInfo {
                index,
                encoding: Encoding::from_sfnt_ids(platform_id, subtable.encoding_id),
                platform_id,
                encoding_id: subtable.encoding_id,
            }
        })
        .collect()
}

/// Strikes from `sbix`, or from the `CBLC`/`EBLC` size records.
fn read_strikes(face: &ttf_parser::Face<'_>) -> Vec<BitmapSize> {
    if let Some(sbix) = face.tables().sbix {
        return sbix
            .strikes
            .into_iter()
            .map(|strike| {
                let ppem = i64::from(strike.pixels_per_em);
                BitmapSize {
                    width: strike.pixels_per_em as i16,
                    height: strike.pixels_per_em as i16,
                    size: ppem * ONE_26_6,
                    x_ppem: ppem * ONE_26_6,
                    y_ppem: ppem * ONE_26_6,
                }
            })
            .collect();
    }

    let raw = face.raw_face();
    let Some(location) = raw
        .table(Tag::from_bytes(b"CBLC"))
        .or_else(|| raw.table(Tag::from_bytes(b"EBLC")))
    else {
        return Vec::new();
    };
    parse_bitmap_size_records(location)
}

// BitmapSize record: 48 bytes after an 8-byte header. Horizontal line metrics
// start at +16 (ascender, descender, widthMax); ppemX/ppemY sit at +44/+45.
fn parse_bitmap_size_records(table: &[u8]) -> Vec<BitmapSize> {
    const HEADER: usize = 8;
    const RECORD: usize = 48;

    let Some(count) = table.get(4..8) else {
        return Vec::new();
    };
    let count = u32::from_be_bytes([count[0], count[1], count[2], count[3]]) as usize;

    table
        .get(HEADER..)
        .unwrap_or_default()
        .chunks_exact(RECORD)
        .take(count)
        .map(|record| {
            let ascender = record[16] as i8 as i16;
            let descender = record[17] as i8 as i16;
            let x_ppem = i64::from(record[44]);
            let y_ppem = i64::from(record[45]);
            BitmapSize {
                width: i16::from(record[18]),
                height: ascender - descender,
                size: y_ppem * ONE_26_6,
                x_ppem: x_ppem * ONE_26_6,
                y_ppem: y_ppem * ONE_26_6,
            }
        })
        .collect()
}

/// Every `(code, glyph index)` pair of charmap `index`, sorted by code, with
/// unmapped codes dropped.
pub fn mapped_codes(face: &ttf_parser::Face<'_>, index: usize) -> Vec<(u32, u32)> {
    let Some(subtable) = face
        .tables()
        .cmap
        .and_then(|cmap| cmap.subtables.into_iter().nth(index))
    else {
        return Vec::new();
    };

    let mut codes = Vec::new();
    subtable.codepoints(|code| {
        if let Some(glyph) = subtable.glyph_index(code)
            && glyph.0 != 0
        {
            codes.push((code, u32::from(glyph.0)));
        }
    });
    codes.sort_unstable_by_key(|&(code, _)| code);
    codes.dedup_by_key(|&mut (code, _)| code);
    codes
}

/// Sum of the horizontal `kern` subtable values for a glyph pair, in font
/// units.
pub fn kern_pair(face: &ttf_parser::Face<'_>, left: GlyphId, right: GlyphId) -> i64 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|subtable| subtable.horizontal && !subtable.variable && !subtable.has_cross_stream)
        .filter_map(|subtable| subtable.glyphs_kerning(left, right))
        .map(i64::from)
        .sum()
}

/// Resolve a 26.6 ppem request into grid-fitted size metrics.
///
/// The ppem is rounded to whole pixels first, the way TrueType hinting needs
/// it; ascender rounds up, descender down, the rest to nearest.
pub fn size_metrics(info: &FaceInfo, x_ppem_26_6: i64, y_ppem_26_6: i64) -> SizeMetrics {
    let x_ppem = (fixed::pix_round(x_ppem_26_6) >> 6).clamp(1, i64::from(u16::MAX));
    let y_ppem = (fixed::pix_round(y_ppem_26_6) >> 6).clamp(1, i64::from(u16::MAX));
    let units_per_em = i64::from(info.units_per_em.max(1));

    let x_scale = fixed::div_fix(x_ppem * ONE_26_6, units_per_em);
    let y_scale = fixed::div_fix(y_ppem * ONE_26_6, units_per_em);

    SizeMetrics {
        x_ppem: x_ppem as u16,
        y_ppem: y_ppem as u16,
        x_scale,
        y_scale,
        ascender: fixed::pix_ceil(fixed::mul_fix(i64::from(info.ascender), y_scale)),
        descender: fixed::pix_floor(fixed::mul_fix(i64::from(info.descender), y_scale)),
        height: fixed::pix_round(fixed::mul_fix(i64::from(info.height), y_scale)),
        max_advance: fixed::pix_round(fixed::mul_fix(
            i64::from(info.max_advance_width),
            x_scale,
        )),
    }
}
