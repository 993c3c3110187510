//! Resident faces and the metadata the rasterizer reports for them.

use std::sync::Arc;

use crate::buffer::FontBuffer;
use crate::constants::{Encoding, FaceFlags, StyleFlags};
use crate::raster::RasterFace;

/// Bounding box in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BBox {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

/// Scaled global metrics for the size currently applied to a face.
///
/// `x_scale`/`y_scale` are 16.16 factors from font units to 26.6 pixels; the
/// remaining distances are 26.6 and grid-fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeMetrics {
    pub x_ppem: u16,
    pub y_ppem: u16,
    pub x_scale: i64,
    pub y_scale: i64,
    pub ascender: i64,
    pub descender: i64,
    pub height: i64,
    pub max_advance: i64,
}

/// One entry of a face's charmap list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharmapInfo {
    /// Position in the face's charmap list.
    pub index: usize,
    pub encoding: Encoding,
    pub platform_id: u16,
    pub encoding_id: u16,
}

impl CharmapInfo {
    /// True for Unicode subtables that cover the full UCS-4 range.
    pub fn is_ucs4(&self) -> bool {
        matches!(
            (self.platform_id, self.encoding_id),
            (3, 10) | (0, 4) | (0, 6)
        )
    }

    /// Pick the charmap to activate for `encoding`.
    ///
    /// Unicode requests prefer a UCS-4 subtable over a BMP-only one; every
    /// other encoding takes the first match in list order.
    pub fn find_best(charmaps: &[CharmapInfo], encoding: Encoding) -> Option<&CharmapInfo> {
        if encoding == Encoding::None {
            return None;
        }
        let mut candidates = charmaps.iter().filter(|cm| cm.encoding == encoding);
        if encoding == Encoding::Unicode {
            let all: Vec<&CharmapInfo> = candidates.collect();
            return all
                .iter()
                .copied()
                .find(|cm| cm.is_ucs4())
                .or_else(|| all.first().copied());
        }
        candidates.next()
    }
}

/// An embedded bitmap strike (`FT_Bitmap_Size`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitmapSize {
    pub width: i16,
    pub height: i16,
    /// Nominal size in 26.6 points.
    pub size: i64,
    /// Horizontal ppem in 26.6.
    pub x_ppem: i64,
    /// Vertical ppem in 26.6.
    pub y_ppem: i64,
}

/// Everything known about a face right after it was opened.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceInfo {
    pub family_name: String,
    pub style_name: String,
    pub face_index: u32,
    pub num_glyphs: u32,
    pub units_per_em: u16,
    pub face_flags: FaceFlags,
    pub style_flags: StyleFlags,
    pub ascender: i16,
    pub descender: i16,
    pub height: i16,
    pub bbox: BBox,
    pub max_advance_width: i16,
    pub max_advance_height: i16,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub charmaps: Vec<CharmapInfo>,
    pub available_sizes: Vec<BitmapSize>,
}

impl FaceInfo {
    /// Whether the face carries kerning data.
    pub fn has_kerning(&self) -> bool {
        self.face_flags.contains(FaceFlags::KERNING)
    }

    pub fn is_scalable(&self) -> bool {
        self.face_flags.contains(FaceFlags::SCALABLE)
    }
}

/// Process-unique identifier of a registered face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u64);

/// A face resident in the registry.
///
/// Owns the rasterizer handle and a share of the font bytes. Size and charmap
/// are properties of the face, so re-selecting it later finds them as they
/// were last applied.
pub struct Face<F> {
    id: FaceId,
    generation: u64,
    raster: F,
    buffer: Arc<FontBuffer>,
    size: Option<SizeMetrics>,
    charmap: Option<CharmapInfo>,
}

impl<F: RasterFace> Face<F> {
    pub(crate) fn new(id: FaceId, buffer: Arc<FontBuffer>, raster: F) -> Self {
        let charmap = raster.active_charmap();
        Face {
            id,
            generation: 0,
            raster,
            buffer,
            size: None,
            charmap,
        }
    }

    pub fn id(&self) -> FaceId {
        self.id
    }

    /// Counter bumped whenever the size or charmap changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn info(&self) -> &FaceInfo {
        self.raster.info()
    }

    pub fn family_name(&self) -> &str {
        &self.raster.info().family_name
    }

    pub fn style_name(&self) -> &str {
        &self.raster.info().style_name
    }

    /// Metrics of the last applied size, if any.
    pub fn size(&self) -> Option<&SizeMetrics> {
        self.size.as_ref()
    }

    /// The active charmap, if any.
    pub fn charmap(&self) -> Option<&CharmapInfo> {
        self.charmap.as_ref()
    }

    pub fn buffer(&self) -> &Arc<FontBuffer> {
        &self.buffer
    }

    pub(crate) fn raster(&self) -> &F {
        &self.raster
    }

    pub(crate) fn raster_mut(&mut self) -> &mut F {
        &mut self.raster
    }

    pub(crate) fn apply_size(&mut self, metrics: SizeMetrics) {
        self.size = Some(metrics);
        self.generation += 1;
    }

    pub(crate) fn apply_charmap(&mut self, charmap: CharmapInfo) {
        self.charmap = Some(charmap);
        self.generation += 1;
    }
}

impl<F: RasterFace> std::fmt::Debug for Face<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id)
            .field("family_name", &self.family_name())
            .field("style_name", &self.style_name())
            .field("generation", &self.generation)
            .field("size", &self.size)
            .field("charmap", &self.charmap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charmap(index: usize, platform_id: u16, encoding_id: u16) -> CharmapInfo {
        CharmapInfo {
            index,
            encoding: Encoding::from_sfnt_ids(platform_id, encoding_id),
            platform_id,
            encoding_id,
        }
    }

    #[test]
    fn test_unicode_prefers_ucs4() {
        let charmaps = vec![charmap(0, 0, 3), charmap(1, 1, 0), charmap(2, 3, 1), charmap(3, 3, 10)];
        let best = CharmapInfo::find_best(&charmaps, Encoding::Unicode).unwrap();
        assert_eq!(best.index, 3);
    }

    #[test]
    fn test_unicode_falls_back_to_bmp() {
        let charmaps = vec![charmap(0, 1, 0), charmap(1, 3, 1)];
        let best = CharmapInfo::find_best(&charmaps, Encoding::Unicode).unwrap();
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_other_encodings_take_first_match() {
        let charmaps = vec![charmap(0, 3, 4), charmap(1, 3, 4)];
        assert_eq!(
            CharmapInfo::find_best(&charmaps, Encoding::Big5).map(|cm| cm.index),
            Some(0)
        );
        assert!(CharmapInfo::find_best(&charmaps, Encoding::Sjis).is_none());
        assert!(CharmapInfo::find_best(&charmaps, Encoding::None).is_none());
    }
}
