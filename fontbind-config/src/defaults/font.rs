//! Default values for font sizing and glyph-loading settings.

use crate::types::{CharmapEncoding, LoadFlagName};

pub fn pixel_size() -> u32 {
    32
}

pub fn dpi() -> u32 {
    72 // Points and pixels coincide at 72 dpi
}

pub fn charmap() -> CharmapEncoding {
    CharmapEncoding::Unicode
}

pub fn load_flags() -> Vec<LoadFlagName> {
    vec![LoadFlagName::Render]
}

pub fn glyph_cache_size() -> usize {
    512 // 0 disables the cache
}

pub fn render_padding() -> u32 {
    4
}

pub fn ascii_threshold() -> u8 {
    128
}
