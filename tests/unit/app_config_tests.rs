/*!
 * Tests for engine configuration loading and validation
 */

use anyhow::Result;
use std::path::Path;

use vocasub::app_config::{Config, LogLevel};

use crate::common;

/// Test that default configuration passes validation
#[test]
fn test_default_config_should_be_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.target_language, "en");
    assert!(config.enable_async_loading);
    assert_eq!(config.texture_cache_capacity, 30);
    assert_eq!(config.monitor.poll_interval_ms, 100);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that language directories derive from root and target language
#[test]
fn test_dirs_with_target_language_should_select_subtree() {
    let mut config = Config::default();
    config.translation_root = Path::new("/data/translation").to_path_buf();
    config.target_language = "zh".to_string();

    assert_eq!(config.text_dir(), Path::new("/data/translation/zh/Text"));
    assert_eq!(
        config.texture_dir(),
        Path::new("/data/translation/zh/Texture")
    );
}

/// Test that loading a config file fills unspecified fields with defaults
#[test]
fn test_from_file_with_partial_json_should_apply_defaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "target_language": "ja", "texture_cache_capacity": 8 }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.texture_cache_capacity, 8);
    assert_eq!(config.monitor.poll_interval_ms, 100);
    assert_eq!(config.style.font, "Arial");
    Ok(())
}

/// Test that malformed JSON is rejected
#[test]
fn test_from_file_with_invalid_json_should_fail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

/// Test that an empty target language fails validation
#[test]
fn test_validate_with_empty_language_should_fail() {
    let mut config = Config::default();
    config.target_language = String::new();
    assert!(config.validate().is_err());
}

/// Test that a zero poll interval fails validation
#[test]
fn test_validate_with_zero_poll_interval_should_fail() {
    let mut config = Config::default();
    config.monitor.poll_interval_ms = 0;
    assert!(config.validate().is_err());
}

/// Test that negative fade durations fail validation
#[test]
fn test_validate_with_negative_fade_should_fail() {
    let mut config = Config::default();
    config.style.fade_out_secs = -1.0;
    assert!(config.validate().is_err());
}

/// Test the log level to filter conversion
#[test]
fn test_log_level_should_map_to_level_filter() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(
        LogLevel::default().to_level_filter(),
        log::LevelFilter::Info
    );
}
