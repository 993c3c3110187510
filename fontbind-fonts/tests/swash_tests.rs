//! Integration tests for the swash rasterizer against a real font.

use fontbind_fonts::{
    ErrorKind, FaceFlags, FontError, KerningMode, LoadFlags, PixelMode, SwashLibrary,
    SwashRasterizer,
};

/// Embedded DejaVu Sans for testing.
const TEST_FONT: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

const FAMILY: &str = "DejaVu Sans";
const STYLE: &str = "Book";

fn library() -> SwashLibrary {
    let mut lib = SwashLibrary::new(SwashRasterizer::new());
    lib.load_font(TEST_FONT.to_vec()).unwrap();
    lib.select_face(FAMILY, STYLE).unwrap();
    lib
}

fn sized_library(px: u32) -> SwashLibrary {
    let mut lib = library();
    lib.set_pixel_size(0, px).unwrap();
    lib
}

#[test]
fn test_face_names_and_flags() {
    let mut lib = SwashLibrary::new(SwashRasterizer::new());
    let descriptors = lib.load_font(TEST_FONT.to_vec()).unwrap();

    assert_eq!(descriptors.len(), 1);
    let face = &descriptors[0];
    assert_eq!(face.family_name, FAMILY);
    assert_eq!(face.style_name, STYLE);
    assert_eq!(face.units_per_em, 2048);
    assert_eq!((face.ascender, face.descender), (1901, -483));
    assert!(face.num_glyphs > 6000);
    assert!(face.face_flags & FaceFlags::SCALABLE.bits() != 0);
    assert!(face.face_flags & FaceFlags::KERNING.bits() != 0);
    assert!(face.charmap.is_some());
    assert!(face.available_sizes.is_empty());
    assert_eq!(lib.faces(), vec![(FAMILY.to_string(), STYLE.to_string())]);
}

#[test]
fn test_loading_twice_is_rejected() {
    let mut lib = library();
    let err = lib.load_font(TEST_FONT.to_vec()).unwrap_err();
    assert!(matches!(
        &err,
        FontError::DuplicateFace { family, style } if family == FAMILY && style == STYLE
    ));
    assert_eq!(err.kind(), ErrorKind::Load);
    assert_eq!(lib.face_count(), 1);
}

#[test]
fn test_pixel_size_metrics() {
    let mut lib = library();
    let metrics = lib.set_pixel_size(0, 32).unwrap();
    assert_eq!((metrics.x_ppem, metrics.y_ppem), (32, 32));
    // 1901 * 32 / 2048 = 29.7 px, rounded up
    assert_eq!(metrics.ascender, 30 * 64);
    // -483 * 32 / 2048 = -7.5 px, rounded down
    assert_eq!(metrics.descender, -8 * 64);
}

#[test]
fn test_char_size_at_dpi() {
    let mut lib = library();
    // 12pt at 144 dpi is 24 px.
    let metrics = lib.set_char_size(0, 12 * 64, 144, 144).unwrap();
    assert_eq!(metrics.y_ppem, 24);
}

#[test]
fn test_oversized_char_size_is_a_size_error() {
    let mut lib = library();
    let err = lib.set_char_size(0, i64::MAX, 72, 72).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Size);

    let err = lib.set_char_size(0, 1 << 40, 72, 72).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Size);

    // The face keeps working afterwards.
    assert_eq!(lib.set_pixel_size(0, 16).unwrap().y_ppem, 16);
}

#[test]
fn test_render_gray_glyph() {
    let mut lib = sized_library(32);
    let glyph = lib.load_glyph('A' as u32, LoadFlags::RENDER).unwrap();

    assert_eq!(glyph.char_code, 'A' as u32);
    assert_eq!(glyph.glyph_index, lib.char_index('A' as u32).unwrap());
    assert!(glyph.advance.x > 0);
    assert_eq!(glyph.advance.x % 64, 0);
    assert!(glyph.bitmap_top > 0);

    let bitmap = glyph.bitmap.as_ref().unwrap();
    assert_eq!(bitmap.pixel_mode, PixelMode::Gray);
    assert_eq!(bitmap.num_grays, 256);
    assert!(bitmap.width > 0 && bitmap.rows > 0);
    assert!(bitmap.buffer.iter().any(|&sample| sample == 255));

    let rgba = glyph.to_rgba().unwrap();
    assert_eq!((rgba.width, rgba.height), (bitmap.width, bitmap.rows));
    assert_eq!(rgba.data.len(), (bitmap.width * bitmap.rows * 4) as usize);
    let alpha: Vec<u8> = rgba.data.chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alpha, bitmap.buffer);
}

#[test]
fn test_space_has_no_bitmap() {
    let mut lib = sized_library(32);
    let glyph = lib.load_glyph(' ' as u32, LoadFlags::RENDER).unwrap();
    assert!(glyph.bitmap.is_none());
    assert!(glyph.to_rgba().is_none());
    assert!(glyph.advance.x > 0);
}

#[test]
fn test_mono_target_renders_one_bit() {
    let mut lib = sized_library(24);
    let glyph = lib
        .load_glyph('B' as u32, LoadFlags::RENDER | LoadFlags::TARGET_MONO)
        .unwrap();
    let bitmap = glyph.bitmap.as_ref().unwrap();
    assert_eq!(bitmap.pixel_mode, PixelMode::Mono);
    assert_eq!(bitmap.num_grays, 2);
    assert!(bitmap.pitch as u32 >= bitmap.width.div_ceil(8));

    let rgba = glyph.to_rgba().unwrap();
    assert!(rgba.data.chunks_exact(4).all(|px| px[3] == 0 || px[3] == 255));
}

#[test]
fn test_lcd_target_is_not_converted() {
    let mut lib = sized_library(24);
    let glyph = lib
        .load_glyph('C' as u32, LoadFlags::RENDER | LoadFlags::TARGET_LCD)
        .unwrap();
    let bitmap = glyph.bitmap.as_ref().unwrap();
    assert_eq!(bitmap.pixel_mode, PixelMode::Lcd);
    assert!(glyph.to_rgba().is_none());
}

#[test]
fn test_outline_load_without_render() {
    let mut lib = sized_library(24);
    let glyph = lib.load_glyph('A' as u32, LoadFlags::DEFAULT).unwrap();
    assert!(glyph.bitmap.is_none());
    assert!(glyph.metrics.width > 0);
}

#[test]
fn test_unmapped_code_is_a_glyph_error() {
    let mut lib = sized_library(24);
    // Private use area, not covered by the font.
    let err = lib.load_glyph(0xF8FF, LoadFlags::RENDER).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Glyph);
}

#[test]
fn test_range_from_zero_starts_at_space() {
    let mut lib = sized_library(16);
    let glyphs = lib.load_glyph_range(0, 0x7E, LoadFlags::RENDER);

    assert_eq!(glyphs.keys().next(), Some(&0x20));
    assert_eq!(glyphs.keys().next_back(), Some(&0x7E));
    assert_eq!(glyphs.len(), 0x7E - 0x20 + 1);
    assert!(glyphs[&0x20].bitmap.is_none());
    assert!(glyphs[&('x' as u32)].bitmap.is_some());
}

#[test]
fn test_kerning_for_av_pair() {
    // Half scale: 16 px over 2048 units per em.
    let lib = sized_library(16);
    let a = lib.char_index('A' as u32).unwrap();
    let v = lib.char_index('V' as u32).unwrap();

    let unscaled = lib.get_kerning(a, v, KerningMode::Unscaled).unwrap();
    assert_eq!(unscaled.x, -131);
    assert_eq!(unscaled.y, 0);

    let unfitted = lib.get_kerning(a, v, KerningMode::Unfitted).unwrap();
    assert_eq!(unfitted.x, -66);

    let fitted = lib.get_kerning(a, v, KerningMode::Default).unwrap();
    assert_eq!(fitted.x, -64);
}

#[test]
fn test_kerning_rejects_bad_glyph_index() {
    let lib = sized_library(32);
    let err = lib
        .get_kerning(u32::MAX, 1, KerningMode::Unscaled)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Kerning);
}
