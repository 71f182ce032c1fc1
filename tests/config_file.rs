#![allow(clippy::unwrap_used)]
//! Config file contract tests.
//!
//! Priority order (highest to lowest):
//! 1. `[translator]` values in config.toml
//! 2. Built-in defaults

use std::fs;

use kotrans::config::{
    ConfigFile, ConfigManager, DEFAULT_MAX_LENGTH, DEFAULT_MODEL_ID, DEFAULT_NUM_BEAMS,
    TranslatorConfig, TranslatorSection, resolve_config,
};
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, contents: &str) -> ConfigManager {
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    ConfigManager::with_path(path)
}

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_path(temp_dir.path().join("absent.toml"));

    let resolved = resolve_config(&manager.load_optional().unwrap()).unwrap();

    assert_eq!(resolved, TranslatorConfig::default());
    assert_eq!(resolved.model_id, DEFAULT_MODEL_ID);
    assert_eq!(resolved.max_length, DEFAULT_MAX_LENGTH);
    assert_eq!(resolved.num_beams, DEFAULT_NUM_BEAMS);
}

#[test]
fn test_partial_file_overrides_only_given_keys() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(
        &temp_dir,
        "[translator]\nmax_length = 120\ntarget_lang = \"jpn_Jpan\"\n",
    );

    let resolved = resolve_config(&manager.load_optional().unwrap()).unwrap();

    assert_eq!(resolved.max_length, 120);
    assert_eq!(resolved.target_lang, "jpn_Jpan");
    assert_eq!(resolved.source_lang, "kor_Hang");
    assert_eq!(resolved.model_id, DEFAULT_MODEL_ID);
    assert_eq!(resolved.num_beams, DEFAULT_NUM_BEAMS);
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(&temp_dir, "");

    let resolved = resolve_config(&manager.load_optional().unwrap()).unwrap();
    assert_eq!(resolved, TranslatorConfig::default());
}

#[test]
fn test_malformed_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(&temp_dir, "[translator]\nmax_length = \"lots\"\n");

    let err = manager.load_optional().unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_unknown_language_rejected() {
    let config = ConfigFile {
        translator: TranslatorSection {
            source_lang: Some("ko".to_string()),
            ..TranslatorSection::default()
        },
    };

    let err = resolve_config(&config).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid language tag"));
}

#[test]
fn test_max_length_too_small_rejected() {
    let config = ConfigFile {
        translator: TranslatorSection {
            max_length: Some(2),
            ..TranslatorSection::default()
        },
    };

    assert!(resolve_config(&config).is_err());
}

#[test]
fn test_beam_override_and_language_outside_common_set() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(
        &temp_dir,
        "[translator]\nnum_beams = 2\ntarget_lang = \"swh_Latn\"\n",
    );

    let resolved = resolve_config(&manager.load_optional().unwrap()).unwrap();
    assert_eq!(resolved.num_beams, 2);
    assert_eq!(resolved.target_lang, "swh_Latn");
}
