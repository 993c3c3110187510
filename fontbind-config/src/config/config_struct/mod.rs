//! Core `Config` struct definition.
//!
//! Every field carries a `#[serde(default = ...)]` so that partial YAML files
//! load cleanly; missing keys take the values from [`crate::defaults`].

use serde::{Deserialize, Serialize};

use crate::types::{CharmapEncoding, LoadFlagName, LogLevel};

/// fontbind configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Logging
    // ========================================================================
    /// Log verbosity when neither `--log-level` nor `RUST_LOG` is given
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,

    /// Optional log file; log records are mirrored there in addition to stderr
    #[serde(default = "crate::defaults::log_file")]
    pub log_file: Option<String>,

    // ========================================================================
    // Sizing
    // ========================================================================
    /// Pixel height requested when no explicit size is given
    #[serde(default = "crate::defaults::pixel_size")]
    pub pixel_size: u32,

    /// Resolution used when a size is given in points
    #[serde(default = "crate::defaults::dpi")]
    pub dpi: u32,

    // ========================================================================
    // Glyph loading
    // ========================================================================
    /// Charmap selected after a face is chosen
    #[serde(default = "crate::defaults::charmap")]
    pub charmap: CharmapEncoding,

    /// Load flags applied when none are given on the command line
    #[serde(default = "crate::defaults::load_flags")]
    pub load_flags: Vec<LoadFlagName>,

    /// Number of loaded glyphs kept in the LRU cache (0 disables caching)
    #[serde(default = "crate::defaults::glyph_cache_size")]
    pub glyph_cache_size: usize,

    // ========================================================================
    // Rendering
    // ========================================================================
    /// Transparent margin around rendered text lines, in pixels
    #[serde(default = "crate::defaults::render_padding")]
    pub render_padding: u32,

    /// Alpha value at or above which a pixel is drawn in ASCII previews
    #[serde(default = "crate::defaults::ascii_threshold")]
    pub ascii_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: crate::defaults::log_level(),
            log_file: crate::defaults::log_file(),
            pixel_size: crate::defaults::pixel_size(),
            dpi: crate::defaults::dpi(),
            charmap: crate::defaults::charmap(),
            load_flags: crate::defaults::load_flags(),
            glyph_cache_size: crate::defaults::glyph_cache_size(),
            render_padding: crate::defaults::render_padding(),
            ascii_threshold: crate::defaults::ascii_threshold(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default pixel size
    pub fn with_pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Set the charmap encoding
    pub fn with_charmap(mut self, charmap: CharmapEncoding) -> Self {
        self.charmap = charmap;
        self
    }

    /// Set the default load flags
    pub fn with_load_flags(mut self, load_flags: Vec<LoadFlagName>) -> Self {
        self.load_flags = load_flags;
        self
    }

    /// Set the glyph cache capacity
    pub fn with_glyph_cache_size(mut self, glyph_cache_size: usize) -> Self {
        self.glyph_cache_size = glyph_cache_size;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}
