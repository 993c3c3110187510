//! LRU cache of loaded glyphs.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::constants::LoadFlags;
use crate::face::FaceId;
use crate::glyph::GlyphResult;

/// Identifies one load request against one face state.
///
/// The generation changes whenever the face's size or charmap changes, so
/// entries from an earlier state are never returned and simply age out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub face: FaceId,
    pub generation: u64,
    pub flags: LoadFlags,
    pub code: u32,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Bounded glyph cache. A capacity of zero disables caching.
pub struct GlyphCache {
    entries: Option<LruCache<GlyphKey, GlyphResult>>,
    hits: u64,
    misses: u64,
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        GlyphCache {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
            misses: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look a glyph up, promoting it to most recently used.
    pub fn get(&mut self, key: &GlyphKey) -> Option<GlyphResult> {
        let entries = self.entries.as_mut()?;
        match entries.get(key) {
            Some(glyph) => {
                self.hits += 1;
                Some(glyph.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: GlyphKey, glyph: &GlyphResult) {
        if let Some(entries) = self.entries.as_mut() {
            entries.put(key, glyph.clone());
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.len(),
            capacity: self.entries.as_ref().map_or(0, |e| e.cap().get()),
        }
    }
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("stats", &self.stats())
            .finish()
    }
}
