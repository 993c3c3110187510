//! Enumerated configuration value types.
//!
//! These are the YAML-facing names for settings; `fontbind-fonts` maps them
//! onto the rasterizer ABI values.

use serde::{Deserialize, Serialize};

// ============================================================================
// Logging
// ============================================================================

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// No logging
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LogLevel::Off => "Off",
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// All available levels
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Parse a level name as accepted on the command line or in `RUST_LOG`.
    ///
    /// Matching is case-insensitive; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<LogLevel> {
        let name = name.trim();
        LogLevel::all()
            .iter()
            .copied()
            .find(|level| level.display_name().eq_ignore_ascii_case(name))
    }
}

// ============================================================================
// Charmap / glyph loading
// ============================================================================

/// Character encoding of the charmap selected after a face is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CharmapEncoding {
    /// Unicode (UCS-2 or UCS-4 subtables)
    #[default]
    Unicode,
    /// Microsoft Symbol
    MsSymbol,
    /// Shift-JIS (Japanese)
    Sjis,
    /// GB 2312 (Simplified Chinese)
    Prc,
    /// Big5 (Traditional Chinese)
    Big5,
    /// Wansung (Korean)
    Wansung,
    /// Johab (Korean)
    Johab,
    /// Adobe Standard (Type 1)
    AdobeStandard,
    /// Adobe Expert (Type 1)
    AdobeExpert,
    /// Adobe Custom (Type 1)
    AdobeCustom,
    /// Adobe Latin-1
    AdobeLatin1,
    /// Old Latin-2
    OldLatin2,
    /// Apple Roman
    AppleRoman,
}

impl CharmapEncoding {
    /// All encodings in declaration order
    pub fn all() -> &'static [CharmapEncoding] {
        &[
            CharmapEncoding::Unicode,
            CharmapEncoding::MsSymbol,
            CharmapEncoding::Sjis,
            CharmapEncoding::Prc,
            CharmapEncoding::Big5,
            CharmapEncoding::Wansung,
            CharmapEncoding::Johab,
            CharmapEncoding::AdobeStandard,
            CharmapEncoding::AdobeExpert,
            CharmapEncoding::AdobeCustom,
            CharmapEncoding::AdobeLatin1,
            CharmapEncoding::OldLatin2,
            CharmapEncoding::AppleRoman,
        ]
    }

    /// Name as written in YAML and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            CharmapEncoding::Unicode => "unicode",
            CharmapEncoding::MsSymbol => "ms_symbol",
            CharmapEncoding::Sjis => "sjis",
            CharmapEncoding::Prc => "prc",
            CharmapEncoding::Big5 => "big5",
            CharmapEncoding::Wansung => "wansung",
            CharmapEncoding::Johab => "johab",
            CharmapEncoding::AdobeStandard => "adobe_standard",
            CharmapEncoding::AdobeExpert => "adobe_expert",
            CharmapEncoding::AdobeCustom => "adobe_custom",
            CharmapEncoding::AdobeLatin1 => "adobe_latin1",
            CharmapEncoding::OldLatin2 => "old_latin2",
            CharmapEncoding::AppleRoman => "apple_roman",
        }
    }

    /// Parse an encoding name; `-` and `_` are interchangeable and case is
    /// ignored.
    pub fn from_name(name: &str) -> Option<CharmapEncoding> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        CharmapEncoding::all()
            .iter()
            .copied()
            .find(|encoding| encoding.name() == normalized)
    }
}

/// Named glyph load flag, combined into the rasterizer's load-flag bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFlagName {
    NoScale,
    NoHinting,
    Render,
    NoBitmap,
    VerticalLayout,
    ForceAutohint,
    CropBitmap,
    Pedantic,
    IgnoreGlobalAdvanceWidth,
    NoRecurse,
    IgnoreTransform,
    Monochrome,
    LinearDesign,
    SbitsOnly,
    NoAutohint,
    Color,
    /// Hinting/render target: light antialiasing
    TargetLight,
    /// Hinting/render target: 1-bit monochrome
    TargetMono,
    /// Hinting/render target: horizontal LCD
    TargetLcd,
    /// Hinting/render target: vertical LCD
    TargetLcdV,
}

impl LoadFlagName {
    /// Parse a flag name as written on the command line (`render`, `no-hinting`,
    /// `no_hinting`, ...).
    pub fn from_name(name: &str) -> Option<LoadFlagName> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let flag = match normalized.as_str() {
            "no_scale" => LoadFlagName::NoScale,
            "no_hinting" => LoadFlagName::NoHinting,
            "render" => LoadFlagName::Render,
            "no_bitmap" => LoadFlagName::NoBitmap,
            "vertical_layout" => LoadFlagName::VerticalLayout,
            "force_autohint" => LoadFlagName::ForceAutohint,
            "crop_bitmap" => LoadFlagName::CropBitmap,
            "pedantic" => LoadFlagName::Pedantic,
            "ignore_global_advance_width" => LoadFlagName::IgnoreGlobalAdvanceWidth,
            "no_recurse" => LoadFlagName::NoRecurse,
            "ignore_transform" => LoadFlagName::IgnoreTransform,
            "monochrome" => LoadFlagName::Monochrome,
            "linear_design" => LoadFlagName::LinearDesign,
            "sbits_only" => LoadFlagName::SbitsOnly,
            "no_autohint" => LoadFlagName::NoAutohint,
            "color" | "colour" => LoadFlagName::Color,
            "target_light" => LoadFlagName::TargetLight,
            "target_mono" => LoadFlagName::TargetMono,
            "target_lcd" => LoadFlagName::TargetLcd,
            "target_lcd_v" => LoadFlagName::TargetLcdV,
            _ => return None,
        };
        Some(flag)
    }
}
