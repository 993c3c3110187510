//! The font library context: resident faces, the active selection, and glyph
//! loading through a [`Rasterizer`].

use std::collections::BTreeMap;
use std::sync::Arc;

use fontbind_config::Config;

use crate::buffer::FontBuffer;
use crate::cache::{CacheStats, GlyphCache, GlyphKey};
use crate::constants::{Encoding, KerningMode, LoadFlags};
use crate::dto::FaceDescriptor;
use crate::error::{FontError, Result};
use crate::face::{CharmapInfo, Face, FaceId, SizeMetrics};
use crate::glyph::{GlyphResult, Vector};
use crate::raster::{RasterError, RasterFace, Rasterizer};
use crate::registry::Registry;

/// Default glyph cache capacity for [`FontLibrary::new`].
pub const DEFAULT_GLYPH_CACHE_SIZE: usize = 512;

/// Owns a rasterizer, every face loaded through it, the active face selection
/// and a glyph cache.
///
/// Nothing here is global: several libraries can coexist, each with its own
/// faces and selection. Dropping the library shuts it down.
pub struct FontLibrary<R: Rasterizer> {
    rasterizer: R,
    registry: Registry<R::Face>,
    active: Option<(String, String)>,
    cache: GlyphCache,
    initialized: bool,
    next_face_id: u64,
}

impl<R: Rasterizer> FontLibrary<R> {
    /// Create a library with the default glyph cache size.
    pub fn new(rasterizer: R) -> Self {
        Self::with_cache_capacity(rasterizer, DEFAULT_GLYPH_CACHE_SIZE)
    }

    /// Create a library caching up to `capacity` glyphs (0 disables the cache).
    pub fn with_cache_capacity(rasterizer: R, capacity: usize) -> Self {
        FontLibrary {
            rasterizer,
            registry: Registry::new(),
            active: None,
            cache: GlyphCache::new(capacity),
            initialized: false,
            next_face_id: 0,
        }
    }

    /// Create a library sized from the user configuration.
    pub fn from_config(rasterizer: R, config: &Config) -> Self {
        Self::with_cache_capacity(rasterizer, config.glyph_cache_size)
    }

    /// Bring the rasterizer up. Idempotent; [`load_font`](Self::load_font)
    /// calls it implicitly.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.rasterizer.init().map_err(FontError::Load)?;
        self.initialized = true;
        log::info!("Font library initialized");
        Ok(())
    }

    /// Drop every face, clear the selection and cache, and tear the rasterizer
    /// down. Safe to call repeatedly; the library can be used again afterwards.
    pub fn shutdown(&mut self) {
        let dropped = self.registry.len();
        self.registry.clear();
        self.active = None;
        self.cache.clear();
        if self.initialized {
            self.rasterizer.shutdown();
            self.initialized = false;
            log::info!("Font library shut down ({} faces released)", dropped);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Load every face of a font file or collection.
    ///
    /// Either all faces are registered or none: a face that fails to open, or
    /// whose family and style are already registered (or repeated inside the
    /// same file), aborts the load and releases the bytes.
    ///
    /// # Returns
    /// One descriptor per face, in face-index order.
    pub fn load_font(&mut self, bytes: impl Into<Arc<[u8]>>) -> Result<Vec<FaceDescriptor>> {
        self.init()?;

        let buffer = FontBuffer::new(bytes);
        let count = self
            .rasterizer
            .face_count(buffer.bytes())
            .map_err(FontError::Load)?;
        if count == 0 {
            return Err(FontError::Load(RasterError::UnknownFormat));
        }

        let mut opened = Vec::with_capacity(count as usize);
        for index in 0..count {
            let raster = self
                .rasterizer
                .open_face(&buffer, index)
                .map_err(|err| {
                    log::warn!("Failed to open face {} of {}: {}", index, count, err);
                    FontError::Load(err)
                })?;
            self.next_face_id += 1;
            opened.push(Face::new(FaceId(self.next_face_id), Arc::clone(&buffer), raster));
        }

        if let Some((family, style)) = self.registry.find_conflict(&opened) {
            log::warn!("Rejecting font: face '{}' '{}' is already loaded", family, style);
            return Err(FontError::DuplicateFace {
                family: family.to_string(),
                style: style.to_string(),
            });
        }

        let descriptors: Vec<FaceDescriptor> = opened.iter().map(FaceDescriptor::from).collect();
        for d in &descriptors {
            log::info!("Loaded face: {} {}", d.family_name, d.style_name);
        }
        self.registry.insert_all(opened);
        Ok(descriptors)
    }

    /// Remove every style of `family`. Unknown families are ignored.
    ///
    /// Clears the selection when it points into the family.
    pub fn unload_font(&mut self, family: &str) {
        let removed = self.registry.remove_family(family);
        if removed == 0 {
            log::debug!("unload_font: family '{}' is not loaded", family);
            return;
        }
        if self
            .active
            .as_ref()
            .is_some_and(|(active_family, _)| active_family == family)
        {
            self.active = None;
        }
        self.cache.clear();
        log::info!("Unloaded {} face(s) of family '{}'", removed, family);
    }

    /// Point the active selection at a registered face. Its size and charmap
    /// are left as they were last applied.
    pub fn select_face(&mut self, family: &str, style: &str) -> Result<FaceDescriptor> {
        let face = self
            .registry
            .get(family, style)
            .ok_or_else(|| FontError::FaceNotFound {
                family: family.to_string(),
                style: style.to_string(),
            })?;
        let descriptor = FaceDescriptor::from(face);
        self.active = Some((family.to_string(), style.to_string()));
        log::debug!("Selected face {} {}", family, style);
        Ok(descriptor)
    }

    /// Registered `(family, style)` pairs in sorted order.
    pub fn faces(&self) -> Vec<(String, String)> {
        self.registry.names()
    }

    /// Descriptors for every registered face, sorted by family then style.
    pub fn descriptors(&self) -> Vec<FaceDescriptor> {
        self.registry.iter().map(FaceDescriptor::from).collect()
    }

    /// Borrow a registered face.
    pub fn face(&self, family: &str, style: &str) -> Option<&Face<R::Face>> {
        self.registry.get(family, style)
    }

    pub fn face_count(&self) -> usize {
        self.registry.len()
    }

    pub fn contains(&self, family: &str, style: &str) -> bool {
        self.registry.contains(family, style)
    }

    /// The active `(family, style)`, if any.
    pub fn active_selection(&self) -> Option<(&str, &str)> {
        self.active
            .as_ref()
            .map(|(family, style)| (family.as_str(), style.as_str()))
    }

    /// Descriptor of the active face, if any.
    pub fn active_face(&self) -> Option<FaceDescriptor> {
        self.active_ref().ok().map(FaceDescriptor::from)
    }

    fn active_ref(&self) -> Result<&Face<R::Face>> {
        let (family, style) = self.active.as_ref().ok_or(FontError::NoFaceSelected)?;
        self.registry
            .get(family, style)
            .ok_or(FontError::NoFaceSelected)
    }

    fn active_mut(&mut self) -> Result<&mut Face<R::Face>> {
        let (family, style) = self.active.as_ref().ok_or(FontError::NoFaceSelected)?;
        self.registry
            .get_mut(family, style)
            .ok_or(FontError::NoFaceSelected)
    }

    // ========================================================================
    // Size and charmap
    // ========================================================================

    /// Set the nominal size of the active face in 26.6 points.
    ///
    /// A zero width or height copies the other; a zero resolution copies the
    /// other, and both zero means 72 dpi.
    pub fn set_char_size(
        &mut self,
        width: i64,
        height: i64,
        hdpi: u32,
        vdpi: u32,
    ) -> Result<SizeMetrics> {
        let (width, height) = square(width, height);
        let (hdpi, vdpi) = match (hdpi, vdpi) {
            (0, 0) => (72, 72),
            (0, v) => (v, v),
            (h, 0) => (h, h),
            (h, v) => (h, v),
        };

        let face = self.active_mut()?;
        let metrics = face
            .raster_mut()
            .set_char_size(width, height, hdpi, vdpi)
            .map_err(FontError::Size)?;
        face.apply_size(metrics);
        log::debug!(
            "Char size {}x{} @ {}x{} dpi -> {}x{} ppem",
            width,
            height,
            hdpi,
            vdpi,
            metrics.x_ppem,
            metrics.y_ppem
        );
        Ok(metrics)
    }

    /// Set the size of the active face in whole pixels. A zero dimension
    /// copies the other; both zero is treated as 1.
    pub fn set_pixel_size(&mut self, width: u32, height: u32) -> Result<SizeMetrics> {
        let (width, height) = square(width, height);
        let (width, height) = (width.max(1), height.max(1));

        let face = self.active_mut()?;
        let metrics = face
            .raster_mut()
            .set_pixel_sizes(width, height)
            .map_err(FontError::Size)?;
        face.apply_size(metrics);
        log::debug!("Pixel size {}x{}", width, height);
        Ok(metrics)
    }

    /// Activate the best charmap for `encoding` on the active face.
    pub fn set_charmap(&mut self, encoding: Encoding) -> Result<CharmapInfo> {
        let face = self.active_mut()?;
        if encoding == Encoding::None {
            return Err(FontError::CharmapNotFound(encoding));
        }
        let charmap = face
            .raster_mut()
            .select_charmap(encoding)
            .map_err(|err| {
                log::debug!("Charmap '{}' not selected: {}", encoding, err);
                FontError::CharmapNotFound(encoding)
            })?;
        face.apply_charmap(charmap);
        Ok(charmap)
    }

    /// Activate charmap `index` of the active face.
    pub fn set_charmap_by_index(&mut self, index: usize) -> Result<CharmapInfo> {
        let face = self.active_mut()?;
        let count = face.info().charmaps.len();
        if index >= count {
            return Err(FontError::CharmapIndexOutOfRange { index, count });
        }
        let charmap = face
            .raster_mut()
            .set_charmap(index)
            .map_err(|err| {
                log::debug!("Charmap {} not selected: {}", index, err);
                FontError::CharmapIndexOutOfRange { index, count }
            })?;
        face.apply_charmap(charmap);
        Ok(charmap)
    }

    /// Glyph index of `code` through the active charmap (0 when unmapped).
    pub fn char_index(&self, code: u32) -> Result<u32> {
        Ok(self.active_ref()?.raster().char_index(code))
    }

    // ========================================================================
    // Glyphs
    // ========================================================================

    /// Load one glyph from the active face.
    pub fn load_glyph(&mut self, code: u32, flags: LoadFlags) -> Result<GlyphResult> {
        let (family, style) = self.active.as_ref().ok_or(FontError::NoFaceSelected)?;
        let face = self
            .registry
            .get_mut(family, style)
            .ok_or(FontError::NoFaceSelected)?;
        load_cached(&mut self.cache, face, code, flags)
    }

    /// Load every mapped code of the active charmap from `first` through
    /// `last` inclusive, in charmap order.
    ///
    /// `first == 0` starts at the charmap's first mapped code. Glyphs that
    /// fail to load are logged and left out. With no face selected the result
    /// is empty.
    pub fn load_glyph_range(
        &mut self,
        first: u32,
        last: u32,
        flags: LoadFlags,
    ) -> BTreeMap<u32, GlyphResult> {
        let mut glyphs = BTreeMap::new();
        let Some((family, style)) = self.active.as_ref() else {
            log::error!("load_glyph_range: no face selected");
            return glyphs;
        };
        let Some(face) = self.registry.get_mut(family, style) else {
            log::error!("load_glyph_range: no face selected");
            return glyphs;
        };

        let (mut code, mut glyph_index) = if first == 0 {
            face.raster().first_char()
        } else {
            face.raster().next_char(first - 1)
        };

        while glyph_index != 0 && code <= last {
            match load_cached(&mut self.cache, face, code, flags) {
                Ok(glyph) => {
                    glyphs.insert(code, glyph);
                }
                Err(err) => log::warn!("Skipping code {}: {}", code, err),
            }

            let (next_code, next_index) = face.raster().next_char(code);
            if next_index != 0 && next_code <= code {
                log::warn!("Charmap walk did not advance past {}; stopping", code);
                break;
            }
            code = next_code;
            glyph_index = next_index;
        }

        log::debug!(
            "Loaded {} glyph(s) for range {}..={}",
            glyphs.len(),
            first,
            last
        );
        glyphs
    }

    /// Load the glyphs for an explicit list of codes. Codes that cannot be
    /// loaded are left out. With no face selected the result is empty.
    pub fn load_glyphs(&mut self, codes: &[u32], flags: LoadFlags) -> BTreeMap<u32, GlyphResult> {
        let mut glyphs = BTreeMap::new();
        let Some((family, style)) = self.active.as_ref() else {
            log::error!("load_glyphs: no face selected");
            return glyphs;
        };
        let Some(face) = self.registry.get_mut(family, style) else {
            log::error!("load_glyphs: no face selected");
            return glyphs;
        };

        for &code in codes {
            if glyphs.contains_key(&code) {
                continue;
            }
            match load_cached(&mut self.cache, face, code, flags) {
                Ok(glyph) => {
                    glyphs.insert(code, glyph);
                }
                Err(err) => log::warn!("Skipping code {}: {}", code, err),
            }
        }
        glyphs
    }

    // ========================================================================
    // Kerning
    // ========================================================================

    /// Kerning between two glyph indices of the active face.
    ///
    /// A face without kerning data yields `Ok(Vector::ZERO)`, which is
    /// indistinguishable from a pair that is simply not kerned.
    pub fn get_kerning(&self, left: u32, right: u32, mode: KerningMode) -> Result<Vector> {
        let face = self.active_ref()?;
        if !face.info().has_kerning() {
            return Ok(Vector::ZERO);
        }
        face.raster()
            .kerning(left, right, mode)
            .map_err(FontError::Kerning)
    }

    /// [`get_kerning`](Self::get_kerning) with every failure logged and
    /// reported as a zero vector.
    pub fn kerning_or_zero(&self, left: u32, right: u32, mode: KerningMode) -> Vector {
        self.get_kerning(left, right, mode).unwrap_or_else(|err| {
            log::error!("Kerning {}/{} failed: {}", left, right, err);
            Vector::ZERO
        })
    }

    // ========================================================================
    // Cache
    // ========================================================================

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<R: Rasterizer> Drop for FontLibrary<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<R: Rasterizer> std::fmt::Debug for FontLibrary<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.registry.len())
            .field("active", &self.active)
            .field("cache", &self.cache)
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Zero in one dimension means "same as the other".
fn square<T: Copy + Default + PartialEq>(width: T, height: T) -> (T, T) {
    let zero = T::default();
    match (width == zero, height == zero) {
        (true, false) => (height, height),
        (false, true) => (width, width),
        _ => (width, height),
    }
}

fn load_cached<F: RasterFace>(
    cache: &mut GlyphCache,
    face: &mut Face<F>,
    code: u32,
    flags: LoadFlags,
) -> Result<GlyphResult> {
    let key = GlyphKey {
        face: face.id(),
        generation: face.generation(),
        flags,
        code,
    };
    if let Some(glyph) = cache.get(&key) {
        return Ok(glyph);
    }

    let slot = face
        .raster_mut()
        .load_char(code, flags)
        .map_err(|source| FontError::Glyph { code, source })?;
    let glyph = GlyphResult::from_slot(code, slot);
    cache.insert(key, &glyph);
    Ok(glyph)
}
