//! Default value functions for configuration.
//!
//! Each sub-module groups related free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.
//! Everything is re-exported from this module.

mod font;
mod misc;

// ── Font sizing & glyph loading ────────────────────────────────────────────
pub use font::{
    ascii_threshold, charmap, dpi, glyph_cache_size, load_flags, pixel_size, render_padding,
};

// ── Miscellaneous ──────────────────────────────────────────────────────────
pub use misc::{log_file, log_level};
