//! Configuration system for fontbind.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for the fontbind command-line host:
//!
//! - Logging level and optional log file
//! - Default pixel size and resolution
//! - Charmap encoding and glyph load flags
//! - Glyph cache capacity and text rendering options

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{CharmapEncoding, LoadFlagName, LogLevel};
