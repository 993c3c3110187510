//! Command-line interface for fontbind.
//!
//! This module handles CLI argument parsing. Value parsers for character
//! codes, code ranges, load flags and charmap names live in the [`parse`]
//! submodule; the subcommands themselves run in [`crate::commands`].

pub mod parse;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fontbind_config::{CharmapEncoding, LoadFlagName};
use fontbind_fonts::{FontSource, KerningMode};

pub use parse::CodeRange;

/// fontbind - Inspect font faces, glyph metrics, kerning and rendered glyphs
#[derive(Debug, Parser)]
#[command(name = "fontbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Read configuration from this file instead of ~/.config/fontbind/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Kerning mode argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum KerningModeArg {
    /// Scaled and grid-fitted
    #[default]
    Default,
    /// Scaled, not grid-fitted
    Unfitted,
    /// Font units
    Unscaled,
}

impl From<KerningModeArg> for KerningMode {
    fn from(arg: KerningModeArg) -> Self {
        match arg {
            KerningModeArg::Default => KerningMode::Default,
            KerningModeArg::Unfitted => KerningMode::Unfitted,
            KerningModeArg::Unscaled => KerningMode::Unscaled,
        }
    }
}

/// Where the font comes from: a file or an installed family.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct FontArgs {
    /// Font file (TTF, OTF, TTC or OTC)
    #[arg(value_name = "FONT", required_unless_present = "system")]
    pub font: Option<PathBuf>,

    /// Use the best installed match for FAMILY instead of a file
    #[arg(long, value_name = "FAMILY", conflicts_with = "font")]
    pub system: Option<String>,

    /// Prefer the bold variant of the system family
    #[arg(long, requires = "system")]
    pub bold: bool,

    /// Prefer the italic variant of the system family
    #[arg(long, requires = "system")]
    pub italic: bool,
}

impl FontArgs {
    /// The source these arguments name, if any.
    pub fn source(&self) -> Option<FontSource> {
        match (&self.font, &self.system) {
            (Some(path), _) => Some(FontSource::file(path)),
            (None, Some(family)) => Some(FontSource::System {
                family: family.clone(),
                bold: self.bold,
                italic: self.italic,
            }),
            (None, None) => None,
        }
    }
}

/// Which face of the file to use and at what size.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct FaceArgs {
    /// Family name of the face (default: the face the source points at)
    #[arg(long, value_name = "FAMILY", requires = "style")]
    pub family: Option<String>,

    /// Style name of the face
    #[arg(long, value_name = "STYLE", requires = "family")]
    pub style: Option<String>,

    /// Pixel size (default: config pixel_size)
    #[arg(long, value_name = "PX", conflicts_with = "points")]
    pub size: Option<u32>,

    /// Nominal size in points, scaled by the config dpi
    #[arg(long, value_name = "PT")]
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Load a font and print a descriptor for every face as JSON
    Faces {
        #[command(flatten)]
        font: FontArgs,
    },

    /// Load glyphs and print them as JSON
    Glyphs {
        #[command(flatten)]
        font: FontArgs,

        #[command(flatten)]
        face: FaceArgs,

        /// Inclusive code range, e.g. `A-Z`, `U+0020-U+007E` or `0-255`
        /// (default: printable ASCII)
        #[arg(long, value_name = "A-B", value_parser = parse::parse_range, conflicts_with = "text")]
        range: Option<CodeRange>,

        /// Load the characters of this text
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,

        /// Comma-separated load flags, e.g. `render,monochrome` (default: config load_flags)
        #[arg(long, value_name = "FLAGS", value_delimiter = ',', value_parser = parse::parse_flag)]
        flags: Vec<LoadFlagName>,

        /// Charmap encoding (default: config charmap)
        #[arg(long, value_name = "ENCODING", value_parser = parse::parse_charmap, conflicts_with = "charmap_index")]
        charmap: Option<CharmapEncoding>,

        /// Select the charmap by its index in the face's charmap list
        #[arg(long, value_name = "INDEX")]
        charmap_index: Option<usize>,
    },

    /// Print the kerning vector between two characters as JSON
    Kern {
        #[command(flatten)]
        font: FontArgs,

        #[command(flatten)]
        face: FaceArgs,

        /// Left character (`A`, `U+0041`, `0x41` or `65`)
        #[arg(long, value_name = "CHAR", value_parser = parse::parse_code)]
        left: u32,

        /// Right character
        #[arg(long, value_name = "CHAR", value_parser = parse::parse_code)]
        right: u32,

        /// Kerning mode
        #[arg(long, value_enum, default_value_t = KerningModeArg::Default)]
        mode: KerningModeArg,
    },

    /// Render one line of text to a PNG file or an ASCII preview
    Render {
        #[command(flatten)]
        font: FontArgs,

        #[command(flatten)]
        face: FaceArgs,

        /// Text to render
        #[arg(long, value_name = "TEXT")]
        text: String,

        /// Write the line as a PNG image
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print an ASCII preview (the default when --out is absent)
        #[arg(long)]
        ascii: bool,

        /// Render 1-bit monochrome glyphs
        #[arg(long)]
        mono: bool,

        /// Skip kerning between glyph pairs
        #[arg(long)]
        no_kerning: bool,
    },
}

/// Runtime options passed from CLI to the application
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOptions {
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
    /// Explicit config file
    pub config_path: Option<PathBuf>,
    /// Subcommand to run
    pub command: Commands,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        RuntimeOptions {
            log_level: cli.log_level.map(|l| l.to_level_filter()),
            config_path: cli.config,
            command: cli.command,
        }
    }
}

/// Parse the process arguments; exits with usage on error.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
