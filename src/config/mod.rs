//! Translator configuration: built-in defaults and the optional config file.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_MAX_LENGTH, DEFAULT_MODEL_ID, DEFAULT_NUM_BEAMS,
    DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG, TranslatorConfig, TranslatorSection, resolve_config,
};
