//! Font byte storage shared by every face opened from one file.

use std::sync::Arc;

/// Owns the raw bytes of one font file (TTF/OTF/TTC).
///
/// A `FontBuffer` is always handled through an `Arc`: every face opened from
/// the file holds a clone, and the bytes are freed when the last face that
/// references them is dropped.
pub struct FontBuffer {
    data: Arc<[u8]>,
}

impl std::fmt::Debug for FontBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBuffer")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontBuffer {
    /// Copy `bytes` into a new shared buffer.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Arc<Self> {
        Arc::new(FontBuffer { data: bytes.into() })
    }

    /// The font file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// A cheap shared handle to the bytes, for rasterizer faces that need to
    /// keep them alive independently of the registry.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Size of the font file in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-length buffer.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
