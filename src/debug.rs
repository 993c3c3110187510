//! Log bridge for the fontbind binary.
//!
//! Routes every `log::info!()` etc. from fontbind and fontbind-fonts to
//! stderr, and mirrors the records to the config's `log_file` when one is set.
//!
//! Level precedence: `--log-level` first, then `RUST_LOG`, then the config's
//! `log_level` (applied once the config is loaded, see [`apply_config`]).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use fontbind_config::{Config, LogLevel};
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

struct LogBridge {
    /// Set when the level came from the command line or `RUST_LOG`.
    pinned: bool,
    file: Mutex<Option<File>>,
}

impl LogBridge {
    fn write_file(&self, line: &str) {
        let mut file = self.file.lock();
        if let Some(ref mut file) = *file {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.target(), &record.args().to_string());
        eprint!("{line}");
        self.write_file(&line);
    }

    fn flush(&self) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_record(level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", get_timestamp(), level, target, msg)
}

/// Pick the effective level from the three sources.
///
/// An unparseable `RUST_LOG` value is ignored.
pub fn resolve_level(
    cli: Option<LevelFilter>,
    env: Option<&str>,
    config: LogLevel,
) -> LevelFilter {
    cli.or_else(|| env.and_then(LogLevel::from_name).map(LogLevel::to_level_filter))
        .unwrap_or_else(|| config.to_level_filter())
}

/// Install the bridge as the global logger.
///
/// Until [`apply_config`] runs, the level falls back to the config default.
/// Calling this twice is a no-op.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env = std::env::var("RUST_LOG").ok();
    let env_level = env.as_deref().and_then(LogLevel::from_name);
    let level = resolve_level(
        cli_level,
        env.as_deref(),
        fontbind_config::defaults::log_level(),
    );

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        pinned: cli_level.is_some() || env_level.is_some(),
        file: Mutex::new(None),
    });
    if log::set_logger(bridge).is_ok() {
        log::set_max_level(level);
    }
}

/// Apply the config's logging settings: its level (unless the command line or
/// `RUST_LOG` already chose one) and its log file.
pub fn apply_config(config: &Config) {
    let Some(bridge) = BRIDGE.get() else {
        return;
    };
    if !bridge.pinned {
        log::set_max_level(config.log_level.to_level_filter());
    }
    if let Some(path) = config.log_file.as_deref() {
        match open_log_file(Path::new(path)) {
            Ok(file) => {
                *bridge.file.lock() = Some(file);
                bridge.write_file(&format!(
                    "\n{}\nfontbind session started at {} (level={})\n{}\n",
                    "=".repeat(80),
                    get_timestamp(),
                    log::max_level(),
                    "=".repeat(80)
                ));
            }
            Err(e) => log::warn!("Cannot open log file {}: {}", path, e),
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
