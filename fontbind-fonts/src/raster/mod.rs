//! The rasterization capability consumed by [`FontLibrary`](crate::FontLibrary).
//!
//! Outline parsing, hinting, scan conversion and antialiasing all live behind
//! these two traits. The library only does bookkeeping on top of them: which
//! faces are resident, which one is selected, and how results are packaged.
//!
//! [`swash_backend`] provides the production implementation.

pub mod sfnt;
pub mod swash_backend;

use std::sync::Arc;

use thiserror::Error;

use crate::buffer::FontBuffer;
use crate::constants::{Encoding, KerningMode, LoadFlags};
use crate::face::{CharmapInfo, FaceInfo, SizeMetrics};
use crate::glyph::{GlyphSlot, Vector};

pub use swash_backend::{SwashFace, SwashRasterizer};

/// Failures reported by a rasterizer backend.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The bytes are not a font container the backend understands.
    #[error("unknown font format")]
    UnknownFormat,

    /// A face inside the container could not be parsed.
    #[error("malformed face: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),

    /// The face index is not present in the container.
    #[error("face index {index} out of range (container has {count} faces)")]
    InvalidFaceIndex { index: u32, count: u32 },

    /// The character code does not map to a glyph in the active charmap.
    #[error("no glyph mapped for code {0}")]
    MissingGlyph(u32),

    /// The glyph index is outside the face's glyph set.
    #[error("glyph index {0} out of range")]
    InvalidGlyphIndex(u32),

    /// A scaled operation ran before any size was applied.
    #[error("no character size set on the face")]
    NoSize,

    /// The requested size cannot be honoured (e.g. no matching strike on a
    /// bitmap-only face).
    #[error("invalid pixel size {x_ppem}x{y_ppem}")]
    InvalidPixelSize { x_ppem: u32, y_ppem: u32 },

    /// No charmap with the requested encoding exists on the face.
    #[error("no charmap with encoding '{0}'")]
    CharmapNotFound(Encoding),

    /// The charmap index is not in the face's list.
    #[error("invalid charmap index {0}")]
    InvalidCharmapIndex(usize),
}

/// Factory side of the capability: probes containers and opens faces.
pub trait Rasterizer {
    /// Handle type for an opened face. Dropping it closes the face.
    type Face: RasterFace;

    /// Bring the backend up. Called once before the first face is opened.
    fn init(&mut self) -> Result<(), RasterError> {
        Ok(())
    }

    /// Tear the backend down after every face has been dropped.
    fn shutdown(&mut self) {}

    /// Number of faces in a container (the "all faces" probe).
    fn face_count(&self, bytes: &[u8]) -> Result<u32, RasterError>;

    /// Open face `index` of `buffer`. The returned face keeps its own share of
    /// the bytes for as long as it lives.
    fn open_face(&mut self, buffer: &Arc<FontBuffer>, index: u32)
    -> Result<Self::Face, RasterError>;
}

/// Operations on one opened face.
pub trait RasterFace {
    /// Names, global metrics, flags, charmaps and fixed sizes.
    fn info(&self) -> &FaceInfo;

    /// Apply a nominal size in 26.6 points at the given resolution. Zero
    /// values have already been normalized by the caller.
    fn set_char_size(
        &mut self,
        width: i64,
        height: i64,
        hdpi: u32,
        vdpi: u32,
    ) -> Result<SizeMetrics, RasterError>;

    /// Apply a size in whole pixels. Both values are at least 1.
    fn set_pixel_sizes(&mut self, width: u32, height: u32) -> Result<SizeMetrics, RasterError>;

    /// Activate the best charmap for `encoding`.
    fn select_charmap(&mut self, encoding: Encoding) -> Result<CharmapInfo, RasterError> {
        let index = CharmapInfo::find_best(&self.info().charmaps, encoding)
            .map(|cm| cm.index)
            .ok_or(RasterError::CharmapNotFound(encoding))?;
        self.set_charmap(index)
    }

    /// Activate charmap `index` of [`FaceInfo::charmaps`].
    fn set_charmap(&mut self, index: usize) -> Result<CharmapInfo, RasterError>;

    /// The charmap in effect, if any.
    fn active_charmap(&self) -> Option<CharmapInfo>;

    /// Glyph index for `code` through the active charmap; 0 when unmapped.
    fn char_index(&self, code: u32) -> u32;

    /// First mapped `(code, glyph index)` of the active charmap; glyph index 0
    /// when the charmap is empty.
    fn first_char(&self) -> (u32, u32);

    /// Next mapped `(code, glyph index)` strictly after `code`; glyph index 0
    /// when the walk is over.
    fn next_char(&self, code: u32) -> (u32, u32);

    /// Load (and optionally render) the glyph for `code`.
    fn load_char(&mut self, code: u32, flags: LoadFlags) -> Result<GlyphSlot, RasterError>;

    /// Kerning between two glyph indices.
    fn kerning(&self, left: u32, right: u32, mode: KerningMode) -> Result<Vector, RasterError>;
}
