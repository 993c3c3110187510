//! Serializable views of faces and glyphs.
//!
//! One DTO per entity, filled by pure `From` conversions. Field names follow
//! the record shapes host code already consumes (`family_name`,
//! `horiBearingX`, `imagedata`, ...), so JSON output can be fed to existing
//! tooling unchanged.

use serde::Serialize;

use crate::bitmap::{Bitmap, RgbaImage};
use crate::face::{BBox, BitmapSize, CharmapInfo, Face, SizeMetrics};
use crate::glyph::{GlyphMetrics, GlyphResult, Vector};
use crate::raster::RasterFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VectorDto {
    pub x: i64,
    pub y: i64,
}

impl From<Vector> for VectorDto {
    fn from(v: Vector) -> Self {
        VectorDto { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BBoxDto {
    #[serde(rename = "xMin")]
    pub x_min: i64,
    #[serde(rename = "yMin")]
    pub y_min: i64,
    #[serde(rename = "xMax")]
    pub x_max: i64,
    #[serde(rename = "yMax")]
    pub y_max: i64,
}

impl From<&BBox> for BBoxDto {
    fn from(b: &BBox) -> Self {
        BBoxDto {
            x_min: b.x_min,
            y_min: b.y_min,
            x_max: b.x_max,
            y_max: b.y_max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeMetricsDto {
    pub x_ppem: u16,
    pub y_ppem: u16,
    pub x_scale: i64,
    pub y_scale: i64,
    pub ascender: i64,
    pub descender: i64,
    pub height: i64,
    pub max_advance: i64,
}

impl From<&SizeMetrics> for SizeMetricsDto {
    fn from(m: &SizeMetrics) -> Self {
        SizeMetricsDto {
            x_ppem: m.x_ppem,
            y_ppem: m.y_ppem,
            x_scale: m.x_scale,
            y_scale: m.y_scale,
            ascender: m.ascender,
            descender: m.descender,
            height: m.height,
            max_advance: m.max_advance,
        }
    }
}

/// `size` member of a face record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeDto {
    pub metrics: SizeMetricsDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharmapDto {
    /// Four-character encoding tag as a number.
    pub encoding: u32,
    pub platform_id: u16,
    pub encoding_id: u16,
}

impl From<&CharmapInfo> for CharmapDto {
    fn from(cm: &CharmapInfo) -> Self {
        CharmapDto {
            encoding: cm.encoding.tag(),
            platform_id: cm.platform_id,
            encoding_id: cm.encoding_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitmapSizeDto {
    pub width: i16,
    pub height: i16,
    pub size: i64,
    pub x_ppem: i64,
    pub y_ppem: i64,
}

impl From<&BitmapSize> for BitmapSizeDto {
    fn from(s: &BitmapSize) -> Self {
        BitmapSizeDto {
            width: s.width,
            height: s.height,
            size: s.size,
            x_ppem: s.x_ppem,
            y_ppem: s.y_ppem,
        }
    }
}

/// A face record: names, global metrics, flags, charmaps and strikes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceDescriptor {
    pub family_name: String,
    pub style_name: String,
    pub face_index: u32,
    pub num_glyphs: u32,
    #[serde(rename = "units_per_EM")]
    pub units_per_em: u16,
    pub face_flags: i64,
    pub style_flags: i64,
    pub ascender: i16,
    pub descender: i16,
    pub height: i16,
    pub bbox: BBoxDto,
    pub max_advance_width: i16,
    pub max_advance_height: i16,
    pub underline_position: i16,
    pub underline_thickness: i16,
    /// Present once a size has been applied.
    pub size: Option<SizeDto>,
    /// The active charmap, if any.
    pub charmap: Option<CharmapDto>,
    pub charmaps: Vec<CharmapDto>,
    pub available_sizes: Vec<BitmapSizeDto>,
}

impl<F: RasterFace> From<&Face<F>> for FaceDescriptor {
    fn from(face: &Face<F>) -> Self {
        let info = face.info();
        FaceDescriptor {
            family_name: info.family_name.clone(),
            style_name: info.style_name.clone(),
            face_index: info.face_index,
            num_glyphs: info.num_glyphs,
            units_per_em: info.units_per_em,
            face_flags: info.face_flags.bits(),
            style_flags: info.style_flags.bits(),
            ascender: info.ascender,
            descender: info.descender,
            height: info.height,
            bbox: BBoxDto::from(&info.bbox),
            max_advance_width: info.max_advance_width,
            max_advance_height: info.max_advance_height,
            underline_position: info.underline_position,
            underline_thickness: info.underline_thickness,
            size: face.size().map(|m| SizeDto {
                metrics: SizeMetricsDto::from(m),
            }),
            charmap: face.charmap().map(CharmapDto::from),
            charmaps: info.charmaps.iter().map(CharmapDto::from).collect(),
            available_sizes: info.available_sizes.iter().map(BitmapSizeDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphMetricsDto {
    pub width: i64,
    pub height: i64,
    #[serde(rename = "horiBearingX")]
    pub hori_bearing_x: i64,
    #[serde(rename = "horiBearingY")]
    pub hori_bearing_y: i64,
    #[serde(rename = "horiAdvance")]
    pub hori_advance: i64,
    #[serde(rename = "vertBearingX")]
    pub vert_bearing_x: i64,
    #[serde(rename = "vertBearingY")]
    pub vert_bearing_y: i64,
    #[serde(rename = "vertAdvance")]
    pub vert_advance: i64,
}

impl From<&GlyphMetrics> for GlyphMetricsDto {
    fn from(m: &GlyphMetrics) -> Self {
        GlyphMetricsDto {
            width: m.width,
            height: m.height,
            hori_bearing_x: m.hori_bearing_x,
            hori_bearing_y: m.hori_bearing_y,
            hori_advance: m.hori_advance,
            vert_bearing_x: m.vert_bearing_x,
            vert_bearing_y: m.vert_bearing_y,
            vert_advance: m.vert_advance,
        }
    }
}

/// Straight-alpha RGBA pixels in the browser `ImageData` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDataDto {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    #[serde(rename = "colorSpace")]
    pub color_space: &'static str,
}

impl From<&RgbaImage> for ImageDataDto {
    fn from(image: &RgbaImage) -> Self {
        ImageDataDto {
            width: image.width,
            height: image.height,
            data: image.data.clone(),
            color_space: RgbaImage::COLOR_SPACE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitmapDto {
    pub rows: u32,
    pub width: u32,
    pub pitch: i32,
    /// `null` for empty bitmaps and unconverted pixel modes.
    pub imagedata: Option<ImageDataDto>,
    pub num_grays: u16,
    pub pixel_mode: u8,
}

impl From<&Bitmap> for BitmapDto {
    fn from(bitmap: &Bitmap) -> Self {
        BitmapDto {
            rows: bitmap.rows,
            width: bitmap.width,
            pitch: bitmap.pitch,
            imagedata: bitmap.to_rgba().as_ref().map(ImageDataDto::from),
            num_grays: bitmap.num_grays,
            pixel_mode: bitmap.pixel_mode.value(),
        }
    }
}

/// A loaded glyph in the glyph-slot record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphDto {
    #[serde(rename = "linearHoriAdvance")]
    pub linear_hori_advance: i64,
    #[serde(rename = "linearVertAdvance")]
    pub linear_vert_advance: i64,
    pub glyph_index: u32,
    pub advance: VectorDto,
    pub metrics: GlyphMetricsDto,
    pub format: u32,
    pub bitmap: BitmapDto,
    pub bitmap_left: i32,
    pub bitmap_top: i32,
}

impl From<&GlyphResult> for GlyphDto {
    fn from(glyph: &GlyphResult) -> Self {
        let empty = Bitmap::default();
        GlyphDto {
            linear_hori_advance: glyph.linear_hori_advance,
            linear_vert_advance: glyph.linear_vert_advance,
            glyph_index: glyph.glyph_index,
            advance: VectorDto::from(glyph.advance),
            metrics: GlyphMetricsDto::from(&glyph.metrics),
            format: glyph.format.value(),
            bitmap: BitmapDto::from(glyph.bitmap.as_ref().unwrap_or(&empty)),
            bitmap_left: glyph.bitmap_left,
            bitmap_top: glyph.bitmap_top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GlyphFormat, PixelMode};

    #[test]
    fn test_glyph_dto_field_names() {
        let glyph = GlyphResult {
            char_code: 65,
            glyph_index: 36,
            linear_hori_advance: 10 << 16,
            advance: Vector::new(640, 0),
            metrics: GlyphMetrics {
                hori_bearing_x: 64,
                ..Default::default()
            },
            format: GlyphFormat::Bitmap,
            bitmap: Some(Bitmap {
                width: 1,
                rows: 1,
                pitch: 1,
                pixel_mode: PixelMode::Gray,
                num_grays: 256,
                buffer: vec![128],
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(GlyphDto::from(&glyph)).unwrap();
        assert_eq!(json["linearHoriAdvance"], 10 << 16);
        assert_eq!(json["glyph_index"], 36);
        assert_eq!(json["advance"]["x"], 640);
        assert_eq!(json["metrics"]["horiBearingX"], 64);
        assert_eq!(json["format"], GlyphFormat::Bitmap.value());
        assert_eq!(json["bitmap"]["pixel_mode"], 2);
        assert_eq!(json["bitmap"]["imagedata"]["colorSpace"], "srgb");
        assert_eq!(
            json["bitmap"]["imagedata"]["data"],
            serde_json::json!([0, 0, 0, 128])
        );
    }

    #[test]
    fn test_glyph_without_bitmap_has_null_imagedata() {
        let glyph = GlyphResult {
            char_code: 32,
            glyph_index: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(GlyphDto::from(&glyph)).unwrap();
        assert!(json["bitmap"]["imagedata"].is_null());
        assert_eq!(json["bitmap"]["rows"], 0);
    }

    #[test]
    fn test_charmap_dto_uses_numeric_tag() {
        let cm = CharmapInfo {
            index: 0,
            encoding: crate::constants::Encoding::Unicode,
            platform_id: 3,
            encoding_id: 1,
        };
        let json = serde_json::to_value(CharmapDto::from(&cm)).unwrap();
        assert_eq!(json["encoding"], 0x756E_6963u32);
        assert_eq!(json["platform_id"], 3);
        assert!(json.get("index").is_none());
    }
}
