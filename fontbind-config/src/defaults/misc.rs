//! Default values for logging settings.

use crate::types::LogLevel;

pub fn log_level() -> LogLevel {
    LogLevel::Warn
}

pub fn log_file() -> Option<String> {
    None
}
