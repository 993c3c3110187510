//! Typed error types for fontbind-fonts.
//!
//! Every public operation on [`FontLibrary`](crate::FontLibrary) returns one of
//! these variants instead of a null result, so callers can tell "valid zero
//! value" apart from "operation failed". [`FontError::kind`] collapses the
//! variants into the coarse taxonomy hosts usually branch on.

use thiserror::Error;

use crate::constants::Encoding;
use crate::raster::RasterError;

/// Coarse failure category of a [`FontError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed font bytes or duplicate registration
    Load,
    /// Unknown family, style, encoding or charmap index
    NotFound,
    /// A face-dependent operation ran without an active face
    NoFaceSelected,
    /// The rasterizer rejected a size request
    Size,
    /// A character code could not be loaded or rendered
    Glyph,
    /// The kerning lookup itself failed
    Kerning,
}

/// Errors produced by the face registry, selector and glyph loader.
#[derive(Debug, Error)]
pub enum FontError {
    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------
    /// The bytes are not a font container the rasterizer recognises, or one
    /// of its faces could not be opened.
    #[error("font data could not be loaded: {0}")]
    Load(#[source] RasterError),

    /// A face with the same family and style is already registered.
    #[error("face '{family}' '{style}' is already loaded")]
    DuplicateFace {
        /// Family name of the rejected face.
        family: String,
        /// Style name of the rejected face.
        style: String,
    },

    // -----------------------------------------------------------------------
    // Not found
    // -----------------------------------------------------------------------
    /// No registered face matches the requested family and style.
    #[error("face '{family}' '{style}' is not loaded")]
    FaceNotFound {
        /// Requested family name.
        family: String,
        /// Requested style name.
        style: String,
    },

    /// The active face has no charmap with the requested encoding.
    #[error("no charmap with encoding '{0}' on the active face")]
    CharmapNotFound(Encoding),

    /// A charmap index is outside the active face's charmap list.
    #[error("charmap index {index} out of range (face has {count} charmaps)")]
    CharmapIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of charmaps on the face.
        count: usize,
    },

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------
    /// A size, charmap, glyph or kerning operation ran with no active face.
    #[error("no face selected; select a face first")]
    NoFaceSelected,

    // -----------------------------------------------------------------------
    // Size / glyph / kerning
    // -----------------------------------------------------------------------
    /// The rasterizer rejected the requested size.
    #[error("size could not be set: {0}")]
    Size(#[source] RasterError),

    /// A character code could not be loaded.
    #[error("glyph for code {code} could not be loaded: {source}")]
    Glyph {
        /// Character code that failed.
        code: u32,
        /// Underlying rasterizer error.
        #[source]
        source: RasterError,
    },

    /// The kerning lookup failed.
    #[error("kerning lookup failed: {0}")]
    Kerning(#[source] RasterError),
}

impl FontError {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FontError::Load(_) | FontError::DuplicateFace { .. } => ErrorKind::Load,
            FontError::FaceNotFound { .. }
            | FontError::CharmapNotFound(_)
            | FontError::CharmapIndexOutOfRange { .. } => ErrorKind::NotFound,
            FontError::NoFaceSelected => ErrorKind::NoFaceSelected,
            FontError::Size(_) => ErrorKind::Size,
            FontError::Glyph { .. } => ErrorKind::Glyph,
            FontError::Kerning(_) => ErrorKind::Kerning,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = FontError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            FontError::Load(RasterError::UnknownFormat).kind(),
            ErrorKind::Load
        );
        assert_eq!(
            FontError::DuplicateFace {
                family: "A".into(),
                style: "B".into()
            }
            .kind(),
            ErrorKind::Load
        );
        assert_eq!(
            FontError::CharmapNotFound(Encoding::Big5).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(FontError::NoFaceSelected.kind(), ErrorKind::NoFaceSelected);
        assert_eq!(
            FontError::Glyph {
                code: 65,
                source: RasterError::MissingGlyph(65)
            }
            .kind(),
            ErrorKind::Glyph
        );
    }

    #[test]
    fn test_error_messages() {
        let err = FontError::CharmapIndexOutOfRange { index: 4, count: 2 };
        assert_eq!(
            err.to_string(),
            "charmap index 4 out of range (face has 2 charmaps)"
        );
        let err = FontError::CharmapNotFound(Encoding::Unicode);
        assert_eq!(
            err.to_string(),
            "no charmap with encoding 'unic' on the active face"
        );
    }
}
