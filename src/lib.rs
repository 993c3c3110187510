// Library exports for testing and potential library use
//
// The binary in `main.rs` is a thin shell over these modules: `cli` parses
// arguments, `debug` installs the log bridge, `commands` runs a subcommand
// against `fontbind-fonts`, and `layout` turns rendered glyphs into an image.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod commands;
pub mod debug;
pub mod layout;

// Re-export the crates the binary is built on
pub use fontbind_config as config;
pub use fontbind_fonts as fonts;
