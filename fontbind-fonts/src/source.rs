//! Where font bytes come from: a file on disk or the system font database.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures while locating or reading font bytes.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no system font matches family '{0}'")]
    NotInstalled(String),
}

/// A font file to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A TTF/OTF/TTC file.
    File(PathBuf),
    /// The best installed match for a family name.
    System {
        family: String,
        bold: bool,
        italic: bool,
    },
}

/// Bytes of a whole font file plus the face the source pointed at.
#[derive(Debug, Clone)]
pub struct FontBytes {
    pub data: Vec<u8>,
    /// Face within the file that matched (always 0 for plain files).
    pub face_index: u32,
    /// Human-readable origin for log and error messages.
    pub origin: String,
}

impl FontSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        FontSource::File(path.into())
    }

    pub fn system(family: impl Into<String>) -> Self {
        FontSource::System {
            family: family.into(),
            bold: false,
            italic: false,
        }
    }

    /// Read the font bytes.
    pub fn read(&self) -> Result<FontBytes, SourceError> {
        match self {
            FontSource::File(path) => read_file(path),
            FontSource::System {
                family,
                bold,
                italic,
            } => find_system_font(family, *bold, *italic),
        }
    }
}

fn read_file(path: &Path) -> Result<FontBytes, SourceError> {
    let data = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(FontBytes {
        data,
        face_index: 0,
        origin: path.display().to_string(),
    })
}

fn find_system_font(family: &str, bold: bool, italic: bool) -> Result<FontBytes, SourceError> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("Font database holds {} faces", db.len());

    let families = [fontdb::Family::Name(family)];
    let query = fontdb::Query {
        families: &families,
        weight: if bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        },
        stretch: fontdb::Stretch::Normal,
        style: if italic {
            fontdb::Style::Italic
        } else {
            fontdb::Style::Normal
        },
    };

    let id = db
        .query(&query)
        .ok_or_else(|| SourceError::NotInstalled(family.to_string()))?;
    let (data, face_index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| SourceError::NotInstalled(family.to_string()))?;

    log::info!("Resolved system font '{}' (face {})", family, face_index);
    Ok(FontBytes {
        data,
        face_index,
        origin: format!("system font '{}'", family),
    })
}
