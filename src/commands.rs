//! Subcommand implementations.
//!
//! Every command loads the font named on the command line into a fresh
//! [`SwashLibrary`], selects a face, and writes its result to `out`: JSON for
//! `faces`, `glyphs` and `kern`, an ASCII preview or a PNG file for `render`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fontbind_config::{CharmapEncoding, Config, LoadFlagName};
use fontbind_fonts::dto::{FaceDescriptor, GlyphDto, VectorDto};
use fontbind_fonts::fixed::f32_to_26_6;
use fontbind_fonts::{
    Encoding, FontLibrary, GlyphResult, KerningMode, LoadFlags, Rasterizer, SizeMetrics,
    SwashLibrary, SwashRasterizer, Vector,
};
use serde::Serialize;

use crate::cli::{CodeRange, Commands, FaceArgs, FontArgs};
use crate::layout;

/// Largest `--points` value accepted.
pub const MAX_POINT_SIZE: f64 = 16384.0;

/// Load the config from `path`, or from the default location.
///
/// A broken default config is reported and replaced by the defaults; an
/// explicitly named file must load.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load().unwrap_or_else(|e| {
            log::warn!("Using default configuration: {:#}", e);
            Config::default()
        })),
    }
}

/// Run one subcommand.
pub fn run(command: &Commands, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Faces { font } => run_faces(font, config, out),
        Commands::Glyphs {
            font,
            face,
            range,
            text,
            flags,
            charmap,
            charmap_index,
        } => {
            let (mut library, faces, face_index) = open_library(font, config)?;
            select_face(&mut library, &faces, face_index, face)?;
            apply_size(&mut library, face, config)?;
            apply_charmap(&mut library, *charmap, *charmap_index, config)?;
            let flags = load_flags(flags, config);
            let glyphs = match text {
                Some(text) => library.load_glyphs(&text_codes(text), flags),
                None => {
                    let range = range.unwrap_or(CodeRange::PRINTABLE_ASCII);
                    library.load_glyph_range(range.first, range.last, flags)
                }
            };
            let descriptor = library
                .active_face()
                .context("No face selected after selection")?;
            write_json(
                out,
                &GlyphsOutput {
                    face: &descriptor,
                    flags: flags.bits(),
                    glyphs: glyphs.iter().map(|(&code, g)| (code, g.into())).collect(),
                },
            )
        }
        Commands::Kern {
            font,
            face,
            left,
            right,
            mode,
        } => {
            let (mut library, faces, face_index) = open_library(font, config)?;
            select_face(&mut library, &faces, face_index, face)?;
            apply_size(&mut library, face, config)?;
            apply_charmap(&mut library, None, None, config)?;
            let output = kern_pair(&library, *left, *right, (*mode).into())?;
            write_json(out, &output)
        }
        Commands::Render {
            font,
            face,
            text,
            out: png,
            ascii,
            mono,
            no_kerning,
        } => {
            let (mut library, faces, face_index) = open_library(font, config)?;
            select_face(&mut library, &faces, face_index, face)?;
            let size = apply_size(&mut library, face, config)?;
            apply_charmap(&mut library, None, None, config)?;

            let mut flags = load_flags(&[], config) | LoadFlags::RENDER;
            if *mono {
                flags |= LoadFlags::MONOCHROME | LoadFlags::TARGET_MONO;
            }
            let glyphs = line_glyphs(&mut library, text, flags);
            let line = layout::layout_line(&glyphs, &size, config.render_padding, |l, r| {
                if *no_kerning {
                    Vector::ZERO
                } else {
                    library.kerning_or_zero(l, r, KerningMode::Default)
                }
            });
            let canvas = layout::composite(&line);

            if let Some(path) = png {
                layout::save_png(&canvas, path)?;
            }
            if *ascii || png.is_none() {
                out.write_all(layout::to_ascii(&canvas, config.ascii_threshold).as_bytes())?;
            }
            Ok(())
        }
    }
}

fn run_faces(font: &FontArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let (_library, faces, _) = open_library(font, config)?;
    write_json(out, &faces)
}

#[derive(Debug, Serialize)]
struct GlyphsOutput<'a> {
    face: &'a FaceDescriptor,
    flags: i32,
    glyphs: BTreeMap<u32, GlyphDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernSide {
    pub char_code: u32,
    pub glyph_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernOutput {
    pub left: KernSide,
    pub right: KernSide,
    pub mode: KerningMode,
    pub kerning: VectorDto,
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Read the font and register every face it contains.
///
/// Returns the library, the descriptors of the loaded faces, and the face
/// index the source pointed at.
fn open_library(
    font: &FontArgs,
    config: &Config,
) -> Result<(SwashLibrary, Vec<FaceDescriptor>, u32)> {
    let source = font
        .source()
        .context("No font given: pass a font file or --system FAMILY")?;
    let bytes = source.read()?;
    let mut library = FontLibrary::from_config(SwashRasterizer::new(), config);
    let faces = library
        .load_font(bytes.data)
        .with_context(|| format!("Failed to load {}", bytes.origin))?;
    log::info!("Loaded {} face(s) from {}", faces.len(), bytes.origin);
    Ok((library, faces, bytes.face_index))
}

/// Select the face named by `args`, or else the face at `face_index`, or else
/// the first face of the file.
pub fn select_face<R: Rasterizer>(
    library: &mut FontLibrary<R>,
    faces: &[FaceDescriptor],
    face_index: u32,
    args: &FaceArgs,
) -> Result<FaceDescriptor> {
    if let (Some(family), Some(style)) = (&args.family, &args.style) {
        return Ok(library.select_face(family, style)?);
    }
    let face = faces
        .iter()
        .find(|f| f.face_index == face_index)
        .or_else(|| faces.first())
        .context("The font contains no faces")?;
    Ok(library.select_face(&face.family_name, &face.style_name)?)
}

/// Apply `--points` (at the config dpi) or `--size` / the config pixel size.
pub fn apply_size<R: Rasterizer>(
    library: &mut FontLibrary<R>,
    args: &FaceArgs,
    config: &Config,
) -> Result<SizeMetrics> {
    let metrics = match args.points {
        Some(points) => {
            if !(points.is_finite() && points > 0.0) {
                bail!("Point size must be positive, got {points}");
            }
            if points > MAX_POINT_SIZE {
                bail!("Point size must be at most {MAX_POINT_SIZE}, got {points}");
            }
            let height = f32_to_26_6(points as f32);
            library.set_char_size(0, height, config.dpi, config.dpi)?
        }
        None => library.set_pixel_size(0, args.size.unwrap_or(config.pixel_size))?,
    };
    Ok(metrics)
}

/// Activate the requested charmap.
///
/// An explicit encoding or index must exist. The config's encoding is a
/// preference: when the face lacks it, the face keeps its default charmap.
pub fn apply_charmap<R: Rasterizer>(
    library: &mut FontLibrary<R>,
    encoding: Option<CharmapEncoding>,
    index: Option<usize>,
    config: &Config,
) -> Result<()> {
    if let Some(index) = index {
        library.set_charmap_by_index(index)?;
        return Ok(());
    }
    match encoding {
        Some(encoding) => {
            library.set_charmap(Encoding::from(encoding))?;
        }
        None => {
            if let Err(e) = library.set_charmap(Encoding::from(config.charmap)) {
                log::warn!("Keeping the default charmap: {}", e);
            }
        }
    }
    Ok(())
}

/// Combine named flags, falling back to the config's flags when none are given.
pub fn load_flags(names: &[LoadFlagName], config: &Config) -> LoadFlags {
    if names.is_empty() {
        LoadFlags::from_names(&config.load_flags)
    } else {
        LoadFlags::from_names(names)
    }
}

fn text_codes(text: &str) -> Vec<u32> {
    text.chars().map(u32::from).collect()
}

/// Load the glyphs of `text` in text order, repeats included. Characters the
/// face cannot load are left out.
fn line_glyphs<R: Rasterizer>(
    library: &mut FontLibrary<R>,
    text: &str,
    flags: LoadFlags,
) -> Vec<GlyphResult> {
    let codes = text_codes(text);
    let loaded = library.load_glyphs(&codes, flags);
    codes
        .iter()
        .filter_map(|code| loaded.get(code).cloned())
        .collect()
}

/// Look up both characters and the kerning between their glyphs.
pub fn kern_pair<R: Rasterizer>(
    library: &FontLibrary<R>,
    left: u32,
    right: u32,
    mode: KerningMode,
) -> Result<KernOutput> {
    let left_index = library.char_index(left)?;
    let right_index = library.char_index(right)?;
    let kerning = if left_index == 0 || right_index == 0 {
        log::warn!(
            "Unmapped character in pair U+{:04X}/U+{:04X}; kerning is zero",
            left,
            right
        );
        Vector::ZERO
    } else {
        library
            .get_kerning(left_index, right_index, mode)
            .with_context(|| format!("Kerning lookup failed for U+{left:04X}/U+{right:04X}"))?
    };
    Ok(KernOutput {
        left: KernSide {
            char_code: left,
            glyph_index: left_index,
        },
        right: KernSide {
            char_code: right,
            glyph_index: right_index,
        },
        mode,
        kerning: kerning.into(),
    })
}
