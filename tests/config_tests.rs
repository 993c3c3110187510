//! Config loading, saving and validation tests.

use fontbind_config::{CharmapEncoding, Config, ConfigError, LoadFlagName, LogLevel};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.log_file, None);
    assert_eq!(config.pixel_size, 32);
    assert_eq!(config.dpi, 72);
    assert_eq!(config.charmap, CharmapEncoding::Unicode);
    assert_eq!(config.load_flags, vec![LoadFlagName::Render]);
    assert_eq!(config.glyph_cache_size, 512);
    assert_eq!(config.render_padding, 4);
    assert_eq!(config.ascii_threshold, 128);
}

#[test]
fn test_config_builders() {
    let config = Config::new()
        .with_pixel_size(48)
        .with_charmap(CharmapEncoding::AppleRoman)
        .with_glyph_cache_size(0)
        .with_log_level(LogLevel::Debug);
    assert_eq!(config.pixel_size, 48);
    assert_eq!(config.charmap, CharmapEncoding::AppleRoman);
    assert_eq!(config.glyph_cache_size, 0);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_config_yaml_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("config.yaml");

    let config = Config::new()
        .with_pixel_size(20)
        .with_load_flags(vec![LoadFlagName::Render, LoadFlagName::Monochrome]);
    config.save_to(&path).expect("save should succeed");
    assert!(path.exists());
    assert!(
        !path.with_extension("yaml.tmp").exists(),
        "temporary file should be renamed away"
    );

    let loaded = Config::load_from(&path).expect("load should succeed");
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_yaml_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "pixel_size: 12\ncharmap: big5\nload_flags: [render, target_mono]\n")
        .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.pixel_size, 12);
    assert_eq!(config.charmap, CharmapEncoding::Big5);
    assert_eq!(
        config.load_flags,
        vec![LoadFlagName::Render, LoadFlagName::TargetMono]
    );
    assert_eq!(config.dpi, 72);
    assert_eq!(config.glyph_cache_size, 512);
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "pixel_size: [not, a, number]\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Parse(_))
    ));
}

#[test]
fn test_out_of_range_value_is_validation_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "dpi: 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Validation(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = Config::load_from(&temp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Io(_))
    ));
}

#[test]
fn test_config_path_is_yaml_in_config_dir() {
    let path = Config::config_path();
    assert_eq!(path.file_name().unwrap(), "config.yaml");
    assert_eq!(path.parent().unwrap(), Config::config_dir());
}

#[test]
fn test_log_level_from_name() {
    assert_eq!(LogLevel::from_name("debug"), Some(LogLevel::Debug));
    assert_eq!(LogLevel::from_name(" WARN "), Some(LogLevel::Warn));
    assert_eq!(LogLevel::from_name("loud"), None);
    assert_eq!(
        LogLevel::Trace.to_level_filter(),
        log::LevelFilter::Trace
    );
}

#[test]
fn test_load_flag_from_name() {
    assert_eq!(LoadFlagName::from_name("render"), Some(LoadFlagName::Render));
    assert_eq!(
        LoadFlagName::from_name("no-hinting"),
        Some(LoadFlagName::NoHinting)
    );
    assert_eq!(
        LoadFlagName::from_name("TARGET_LCD_V"),
        Some(LoadFlagName::TargetLcdV)
    );
    assert_eq!(LoadFlagName::from_name("bold"), None);
}

#[test]
fn test_charmap_from_name() {
    assert_eq!(
        CharmapEncoding::from_name("Apple-Roman"),
        Some(CharmapEncoding::AppleRoman)
    );
    assert_eq!(
        CharmapEncoding::from_name(" unicode "),
        Some(CharmapEncoding::Unicode)
    );
    assert_eq!(CharmapEncoding::from_name("latin9"), None);
    for encoding in CharmapEncoding::all() {
        assert_eq!(CharmapEncoding::from_name(encoding.name()), Some(*encoding));
    }
}
