//! Rasterizer ABI constants.
//!
//! Numeric values match the FreeType public headers bit-for-bit so that load
//! flags, encodings and flag words can be exchanged with hosts that were
//! written against the FreeType API.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use fontbind_config::{CharmapEncoding, LoadFlagName};
use serde::Serialize;

/// Build a four-character tag the way `FT_ENC_TAG` / `FT_IMAGE_TAG` do.
pub const fn four_cc(tag: &[u8; 4]) -> u32 {
    ((tag[0] as u32) << 24) | ((tag[1] as u32) << 16) | ((tag[2] as u32) << 8) | tag[3] as u32
}

// ============================================================================
// Load flags
// ============================================================================

/// Glyph load flags (`FT_LOAD_*`) plus an optional hinting target in bits 16..20.
///
/// The value is passed through to the rasterizer untouched; this type only
/// provides named constants and bit helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct LoadFlags(pub i32);

impl LoadFlags {
    pub const DEFAULT: LoadFlags = LoadFlags(0);
    pub const NO_SCALE: LoadFlags = LoadFlags(1 << 0);
    pub const NO_HINTING: LoadFlags = LoadFlags(1 << 1);
    pub const RENDER: LoadFlags = LoadFlags(1 << 2);
    pub const NO_BITMAP: LoadFlags = LoadFlags(1 << 3);
    pub const VERTICAL_LAYOUT: LoadFlags = LoadFlags(1 << 4);
    pub const FORCE_AUTOHINT: LoadFlags = LoadFlags(1 << 5);
    pub const CROP_BITMAP: LoadFlags = LoadFlags(1 << 6);
    pub const PEDANTIC: LoadFlags = LoadFlags(1 << 7);
    pub const IGNORE_GLOBAL_ADVANCE_WIDTH: LoadFlags = LoadFlags(1 << 9);
    pub const NO_RECURSE: LoadFlags = LoadFlags(1 << 10);
    pub const IGNORE_TRANSFORM: LoadFlags = LoadFlags(1 << 11);
    pub const MONOCHROME: LoadFlags = LoadFlags(1 << 12);
    pub const LINEAR_DESIGN: LoadFlags = LoadFlags(1 << 13);
    pub const SBITS_ONLY: LoadFlags = LoadFlags(1 << 14);
    pub const NO_AUTOHINT: LoadFlags = LoadFlags(1 << 15);
    pub const COLOR: LoadFlags = LoadFlags(1 << 20);
    pub const COMPUTE_METRICS: LoadFlags = LoadFlags(1 << 21);
    pub const BITMAP_METRICS_ONLY: LoadFlags = LoadFlags(1 << 22);
    pub const NO_SVG: LoadFlags = LoadFlags(1 << 24);

    pub const TARGET_NORMAL: LoadFlags = LoadFlags::target(RenderMode::Normal);
    pub const TARGET_LIGHT: LoadFlags = LoadFlags::target(RenderMode::Light);
    pub const TARGET_MONO: LoadFlags = LoadFlags::target(RenderMode::Mono);
    pub const TARGET_LCD: LoadFlags = LoadFlags::target(RenderMode::Lcd);
    pub const TARGET_LCD_V: LoadFlags = LoadFlags::target(RenderMode::LcdV);

    /// `FT_LOAD_TARGET_(mode)`
    pub const fn target(mode: RenderMode) -> LoadFlags {
        LoadFlags(((mode as i32) & 15) << 16)
    }

    /// Raw flag word.
    pub const fn bits(self) -> i32 {
        self.0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(self, other: LoadFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// `FT_LOAD_TARGET_MODE(flags)`
    pub fn target_mode(self) -> RenderMode {
        RenderMode::from_bits(((self.0 >> 16) & 15) as u32)
    }

    /// Combine named configuration flags into a flag word.
    pub fn from_names(names: &[LoadFlagName]) -> LoadFlags {
        names
            .iter()
            .fold(LoadFlags::DEFAULT, |acc, name| acc | LoadFlags::from(*name))
    }
}

impl BitOr for LoadFlags {
    type Output = LoadFlags;

    fn bitor(self, rhs: LoadFlags) -> LoadFlags {
        LoadFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LoadFlags {
    fn bitor_assign(&mut self, rhs: LoadFlags) {
        self.0 |= rhs.0;
    }
}

impl From<LoadFlagName> for LoadFlags {
    fn from(name: LoadFlagName) -> Self {
        match name {
            LoadFlagName::NoScale => LoadFlags::NO_SCALE,
            LoadFlagName::NoHinting => LoadFlags::NO_HINTING,
            LoadFlagName::Render => LoadFlags::RENDER,
            LoadFlagName::NoBitmap => LoadFlags::NO_BITMAP,
            LoadFlagName::VerticalLayout => LoadFlags::VERTICAL_LAYOUT,
            LoadFlagName::ForceAutohint => LoadFlags::FORCE_AUTOHINT,
            LoadFlagName::CropBitmap => LoadFlags::CROP_BITMAP,
            LoadFlagName::Pedantic => LoadFlags::PEDANTIC,
            LoadFlagName::IgnoreGlobalAdvanceWidth => LoadFlags::IGNORE_GLOBAL_ADVANCE_WIDTH,
            LoadFlagName::NoRecurse => LoadFlags::NO_RECURSE,
            LoadFlagName::IgnoreTransform => LoadFlags::IGNORE_TRANSFORM,
            LoadFlagName::Monochrome => LoadFlags::MONOCHROME,
            LoadFlagName::LinearDesign => LoadFlags::LINEAR_DESIGN,
            LoadFlagName::SbitsOnly => LoadFlags::SBITS_ONLY,
            LoadFlagName::NoAutohint => LoadFlags::NO_AUTOHINT,
            LoadFlagName::Color => LoadFlags::COLOR,
            LoadFlagName::TargetLight => LoadFlags::TARGET_LIGHT,
            LoadFlagName::TargetMono => LoadFlags::TARGET_MONO,
            LoadFlagName::TargetLcd => LoadFlags::TARGET_LCD,
            LoadFlagName::TargetLcdV => LoadFlags::TARGET_LCD_V,
        }
    }
}

/// Render mode encoded in the load-target bits (`FT_RENDER_MODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RenderMode {
    Normal = 0,
    Light = 1,
    Mono = 2,
    Lcd = 3,
    LcdV = 4,
    Sdf = 5,
}

impl RenderMode {
    fn from_bits(bits: u32) -> RenderMode {
        match bits {
            1 => RenderMode::Light,
            2 => RenderMode::Mono,
            3 => RenderMode::Lcd,
            4 => RenderMode::LcdV,
            5 => RenderMode::Sdf,
            _ => RenderMode::Normal,
        }
    }
}

// ============================================================================
// Encodings
// ============================================================================

/// Charmap encoding tag (`FT_ENCODING_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum Encoding {
    None = 0,
    MsSymbol = four_cc(b"symb"),
    Unicode = four_cc(b"unic"),
    Sjis = four_cc(b"sjis"),
    Prc = four_cc(b"gb  "),
    Big5 = four_cc(b"big5"),
    Wansung = four_cc(b"wans"),
    Johab = four_cc(b"joha"),
    AdobeStandard = four_cc(b"ADOB"),
    AdobeExpert = four_cc(b"ADBE"),
    AdobeCustom = four_cc(b"ADBC"),
    AdobeLatin1 = four_cc(b"lat1"),
    OldLatin2 = four_cc(b"lat2"),
    AppleRoman = four_cc(b"armn"),
}

impl Encoding {
    /// Numeric tag value.
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Look an encoding up by its numeric tag.
    pub fn from_tag(tag: u32) -> Option<Encoding> {
        const ALL: [Encoding; 14] = [
            Encoding::None,
            Encoding::MsSymbol,
            Encoding::Unicode,
            Encoding::Sjis,
            Encoding::Prc,
            Encoding::Big5,
            Encoding::Wansung,
            Encoding::Johab,
            Encoding::AdobeStandard,
            Encoding::AdobeExpert,
            Encoding::AdobeCustom,
            Encoding::AdobeLatin1,
            Encoding::OldLatin2,
            Encoding::AppleRoman,
        ];
        ALL.into_iter().find(|e| e.tag() == tag)
    }

    /// Encoding implied by an SFNT `cmap` subtable's platform and encoding ids.
    pub fn from_sfnt_ids(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Unicode,
            (1, 0) => Encoding::AppleRoman,
            (3, 0) => Encoding::MsSymbol,
            (3, 1) | (3, 10) => Encoding::Unicode,
            (3, 2) => Encoding::Sjis,
            (3, 3) => Encoding::Prc,
            (3, 4) => Encoding::Big5,
            (3, 5) => Encoding::Wansung,
            (3, 6) => Encoding::Johab,
            _ => Encoding::None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Encoding::None {
            return f.write_str("none");
        }
        let bytes = self.tag().to_be_bytes();
        f.write_str(String::from_utf8_lossy(&bytes).trim_end())
    }
}

impl From<CharmapEncoding> for Encoding {
    fn from(encoding: CharmapEncoding) -> Self {
        match encoding {
            CharmapEncoding::Unicode => Encoding::Unicode,
            CharmapEncoding::MsSymbol => Encoding::MsSymbol,
            CharmapEncoding::Sjis => Encoding::Sjis,
            CharmapEncoding::Prc => Encoding::Prc,
            CharmapEncoding::Big5 => Encoding::Big5,
            CharmapEncoding::Wansung => Encoding::Wansung,
            CharmapEncoding::Johab => Encoding::Johab,
            CharmapEncoding::AdobeStandard => Encoding::AdobeStandard,
            CharmapEncoding::AdobeExpert => Encoding::AdobeExpert,
            CharmapEncoding::AdobeCustom => Encoding::AdobeCustom,
            CharmapEncoding::AdobeLatin1 => Encoding::AdobeLatin1,
            CharmapEncoding::OldLatin2 => Encoding::OldLatin2,
            CharmapEncoding::AppleRoman => Encoding::AppleRoman,
        }
    }
}

// ============================================================================
// Face and style flags
// ============================================================================

/// Face capability bits (`FT_FACE_FLAG_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct FaceFlags(pub i64);

impl FaceFlags {
    pub const SCALABLE: FaceFlags = FaceFlags(1 << 0);
    pub const FIXED_SIZES: FaceFlags = FaceFlags(1 << 1);
    pub const FIXED_WIDTH: FaceFlags = FaceFlags(1 << 2);
    pub const SFNT: FaceFlags = FaceFlags(1 << 3);
    pub const HORIZONTAL: FaceFlags = FaceFlags(1 << 4);
    pub const VERTICAL: FaceFlags = FaceFlags(1 << 5);
    pub const KERNING: FaceFlags = FaceFlags(1 << 6);
    pub const FAST_GLYPHS: FaceFlags = FaceFlags(1 << 7);
    pub const MULTIPLE_MASTERS: FaceFlags = FaceFlags(1 << 8);
    pub const GLYPH_NAMES: FaceFlags = FaceFlags(1 << 9);
    pub const EXTERNAL_STREAM: FaceFlags = FaceFlags(1 << 10);
    pub const HINTER: FaceFlags = FaceFlags(1 << 11);
    pub const CID_KEYED: FaceFlags = FaceFlags(1 << 12);
    pub const TRICKY: FaceFlags = FaceFlags(1 << 13);
    pub const COLOR: FaceFlags = FaceFlags(1 << 14);
    pub const VARIATION: FaceFlags = FaceFlags(1 << 15);
    pub const SVG: FaceFlags = FaceFlags(1 << 16);
    pub const SBIX: FaceFlags = FaceFlags(1 << 17);
    pub const SBIX_OVERLAY: FaceFlags = FaceFlags(1 << 18);

    pub const fn bits(self) -> i64 {
        self.0
    }

    pub const fn contains(self, other: FaceFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set or clear `flag` depending on `on`.
    pub fn set(&mut self, flag: FaceFlags, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for FaceFlags {
    type Output = FaceFlags;

    fn bitor(self, rhs: FaceFlags) -> FaceFlags {
        FaceFlags(self.0 | rhs.0)
    }
}

/// Style bits (`FT_STYLE_FLAG_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StyleFlags(pub i64);

impl StyleFlags {
    pub const ITALIC: StyleFlags = StyleFlags(1 << 0);
    pub const BOLD: StyleFlags = StyleFlags(1 << 1);

    pub const fn bits(self) -> i64 {
        self.0
    }

    pub const fn contains(self, other: StyleFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StyleFlags {
    type Output = StyleFlags;

    fn bitor(self, rhs: StyleFlags) -> StyleFlags {
        StyleFlags(self.0 | rhs.0)
    }
}

// ============================================================================
// Pixel modes, glyph formats, kerning modes
// ============================================================================

/// Bitmap sample layout (`FT_PIXEL_MODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u8)]
pub enum PixelMode {
    #[default]
    None = 0,
    Mono = 1,
    Gray = 2,
    Gray2 = 3,
    Gray4 = 4,
    Lcd = 5,
    LcdV = 6,
    Bgra = 7,
}

impl PixelMode {
    /// `FT_PIXEL_MODE_MAX`
    pub const MAX: u8 = 8;

    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Glyph image format (`FT_GLYPH_FORMAT_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u32)]
pub enum GlyphFormat {
    #[default]
    None = 0,
    Composite = four_cc(b"comp"),
    Bitmap = four_cc(b"bits"),
    Outline = four_cc(b"outl"),
    Plotter = four_cc(b"plot"),
    Svg = four_cc(b"SVG "),
}

impl GlyphFormat {
    pub const fn value(self) -> u32 {
        self as u32
    }
}

/// Kerning lookup mode (`FT_KERNING_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u32)]
pub enum KerningMode {
    /// Scaled and grid-fitted distances
    #[default]
    Default = 0,
    /// Scaled but not grid-fitted
    Unfitted = 1,
    /// Font units
    Unscaled = 2,
}

impl KerningMode {
    /// Map a host-supplied mode number; unknown values fall back to `Default`.
    pub fn from_value(value: u32) -> KerningMode {
        match value {
            1 => KerningMode::Unfitted,
            2 => KerningMode::Unscaled,
            _ => KerningMode::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flag_values() {
        assert_eq!(LoadFlags::DEFAULT.bits(), 0x0);
        assert_eq!(LoadFlags::NO_SCALE.bits(), 0x1);
        assert_eq!(LoadFlags::NO_HINTING.bits(), 0x2);
        assert_eq!(LoadFlags::RENDER.bits(), 0x4);
        assert_eq!(LoadFlags::NO_BITMAP.bits(), 0x8);
        assert_eq!(LoadFlags::VERTICAL_LAYOUT.bits(), 0x10);
        assert_eq!(LoadFlags::FORCE_AUTOHINT.bits(), 0x20);
        assert_eq!(LoadFlags::CROP_BITMAP.bits(), 0x40);
        assert_eq!(LoadFlags::PEDANTIC.bits(), 0x80);
        assert_eq!(LoadFlags::IGNORE_GLOBAL_ADVANCE_WIDTH.bits(), 0x200);
        assert_eq!(LoadFlags::NO_RECURSE.bits(), 0x400);
        assert_eq!(LoadFlags::IGNORE_TRANSFORM.bits(), 0x800);
        assert_eq!(LoadFlags::MONOCHROME.bits(), 0x1000);
        assert_eq!(LoadFlags::LINEAR_DESIGN.bits(), 0x2000);
        assert_eq!(LoadFlags::SBITS_ONLY.bits(), 0x4000);
        assert_eq!(LoadFlags::NO_AUTOHINT.bits(), 0x8000);
        assert_eq!(LoadFlags::COLOR.bits(), 0x100000);
    }

    #[test]
    fn test_load_targets() {
        assert_eq!(LoadFlags::TARGET_NORMAL.bits(), 0x00000);
        assert_eq!(LoadFlags::TARGET_LIGHT.bits(), 0x10000);
        assert_eq!(LoadFlags::TARGET_MONO.bits(), 0x20000);
        assert_eq!(LoadFlags::TARGET_LCD.bits(), 0x30000);
        assert_eq!(LoadFlags::TARGET_LCD_V.bits(), 0x40000);

        let flags = LoadFlags::RENDER | LoadFlags::TARGET_MONO;
        assert_eq!(flags.target_mode(), RenderMode::Mono);
        assert!(flags.contains(LoadFlags::RENDER));
        assert!(!flags.contains(LoadFlags::NO_HINTING));
    }

    #[test]
    fn test_load_flags_from_names() {
        let flags = LoadFlags::from_names(&[LoadFlagName::Render, LoadFlagName::Monochrome]);
        assert_eq!(flags.bits(), 0x1004);
        assert_eq!(LoadFlags::from_names(&[]), LoadFlags::DEFAULT);
    }

    #[test]
    fn test_encoding_tags() {
        assert_eq!(Encoding::None.tag(), 0);
        assert_eq!(Encoding::Unicode.tag(), 0x756E_6963);
        assert_eq!(Encoding::MsSymbol.tag(), 0x7379_6D62);
        assert_eq!(Encoding::Prc.tag(), 0x6762_2020);
        assert_eq!(Encoding::AppleRoman.tag(), 0x6172_6D6E);
        assert_eq!(Encoding::from_tag(0x6269_6735), Some(Encoding::Big5));
        assert_eq!(Encoding::from_tag(42), None);
        assert_eq!(Encoding::Unicode.to_string(), "unic");
        assert_eq!(Encoding::Prc.to_string(), "gb");
    }

    #[test]
    fn test_encoding_from_sfnt_ids() {
        assert_eq!(Encoding::from_sfnt_ids(3, 1), Encoding::Unicode);
        assert_eq!(Encoding::from_sfnt_ids(3, 10), Encoding::Unicode);
        assert_eq!(Encoding::from_sfnt_ids(0, 4), Encoding::Unicode);
        assert_eq!(Encoding::from_sfnt_ids(1, 0), Encoding::AppleRoman);
        assert_eq!(Encoding::from_sfnt_ids(3, 0), Encoding::MsSymbol);
        assert_eq!(Encoding::from_sfnt_ids(3, 4), Encoding::Big5);
        assert_eq!(Encoding::from_sfnt_ids(7, 7), Encoding::None);
    }

    #[test]
    fn test_face_and_style_flags() {
        assert_eq!(FaceFlags::SCALABLE.bits(), 1);
        assert_eq!(FaceFlags::KERNING.bits(), 64);
        assert_eq!(FaceFlags::COLOR.bits(), 1 << 14);
        assert_eq!(FaceFlags::SBIX_OVERLAY.bits(), 1 << 18);
        assert_eq!(StyleFlags::ITALIC.bits(), 1);
        assert_eq!(StyleFlags::BOLD.bits(), 2);

        let mut flags = FaceFlags::SCALABLE | FaceFlags::SFNT;
        flags.set(FaceFlags::KERNING, true);
        assert!(flags.contains(FaceFlags::KERNING));
        flags.set(FaceFlags::SCALABLE, false);
        assert!(!flags.contains(FaceFlags::SCALABLE));
    }

    #[test]
    fn test_pixel_modes_and_formats() {
        assert_eq!(PixelMode::None.value(), 0);
        assert_eq!(PixelMode::Mono.value(), 1);
        assert_eq!(PixelMode::Gray.value(), 2);
        assert_eq!(PixelMode::Bgra.value(), 7);
        assert_eq!(PixelMode::MAX, 8);
        assert_eq!(GlyphFormat::Bitmap.value(), 0x6269_7473);
        assert_eq!(GlyphFormat::Outline.value(), 0x6F75_746C);
        assert_eq!(KerningMode::from_value(2), KerningMode::Unscaled);
        assert_eq!(KerningMode::from_value(9), KerningMode::Default);
    }
}
