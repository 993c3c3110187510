//! Font face registry, glyph loading and bitmap conversion for fontbind.
//!
//! This crate provides:
//! - A registry of loaded faces keyed by family and style name, with
//!   all-or-nothing loading of font files and collections
//! - An active-face selection with per-face size and charmap state
//! - Glyph loading by code, by charmap range, or by explicit code list, with
//!   an LRU glyph cache
//! - Conversion of rendered gray and mono bitmaps to straight-alpha RGBA
//! - Serializable DTOs for faces and glyphs
//!
//! # Architecture
//!
//! [`FontLibrary`] is the context object. It drives a [`Rasterizer`]
//! implementation, which does the actual outline parsing, hinting and scan
//! conversion; [`SwashRasterizer`] is the production backend. Everything in
//! this crate above that trait is bookkeeping:
//! 1. Bytes are wrapped in a shared [`FontBuffer`]
//! 2. Each face of the file is opened and registered as a [`Face`]
//! 3. Size, charmap and glyph requests go to the selected face
//! 4. Rendered bitmaps are converted with [`Bitmap::to_rgba`]

pub mod bitmap;
pub mod buffer;
pub mod cache;
pub mod constants;
pub mod dto;
pub mod error;
pub mod face;
pub mod fixed;
pub mod glyph;
pub mod library;
pub mod raster;
pub mod registry;
pub mod source;

// Re-export main types for convenience
pub use bitmap::{Bitmap, RgbaImage};
pub use buffer::FontBuffer;
pub use cache::CacheStats;
pub use constants::{
    Encoding, FaceFlags, GlyphFormat, KerningMode, LoadFlags, PixelMode, RenderMode, StyleFlags,
};
pub use error::{ErrorKind, FontError, Result};
pub use face::{BBox, BitmapSize, CharmapInfo, Face, FaceId, FaceInfo, SizeMetrics};
pub use glyph::{GlyphMetrics, GlyphResult, GlyphSlot, Vector};
pub use library::FontLibrary;
pub use raster::{RasterError, RasterFace, Rasterizer, SwashFace, SwashRasterizer};
pub use source::{FontBytes, FontSource, SourceError};

/// A library backed by the swash rasterizer.
pub type SwashLibrary = FontLibrary<SwashRasterizer>;
