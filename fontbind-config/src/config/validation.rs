//! Semantic validation of loaded configuration values.

use super::config_struct::Config;
use crate::error::ConfigError;
use crate::types::LoadFlagName;

/// Largest pixel size accepted from configuration.
pub const MAX_PIXEL_SIZE: u32 = 4096;

/// Largest resolution accepted from configuration.
pub const MAX_DPI: u32 = 2400;

impl Config {
    /// Check field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_size == 0 || self.pixel_size > MAX_PIXEL_SIZE {
            return Err(ConfigError::Validation(format!(
                "pixel_size must be between 1 and {MAX_PIXEL_SIZE}, got {}",
                self.pixel_size
            )));
        }

        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(ConfigError::Validation(format!(
                "dpi must be between 1 and {MAX_DPI}, got {}",
                self.dpi
            )));
        }

        let targets: Vec<&LoadFlagName> = self
            .load_flags
            .iter()
            .filter(|flag| {
                matches!(
                    flag,
                    LoadFlagName::TargetLight
                        | LoadFlagName::TargetMono
                        | LoadFlagName::TargetLcd
                        | LoadFlagName::TargetLcdV
                )
            })
            .collect();
        if targets.len() > 1 {
            return Err(ConfigError::Validation(format!(
                "load_flags may name at most one target, got {targets:?}"
            )));
        }

        Ok(())
    }
}
