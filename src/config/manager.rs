use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::translation::validate_language;

/// Hugging Face repository holding the ONNX export of NLLB-200.
pub const DEFAULT_MODEL_ID: &str = "Xenova/nllb-200-distilled-600M";
/// FLORES-200 tag of the input language.
pub const DEFAULT_SOURCE_LANG: &str = "kor_Hang";
/// FLORES-200 tag forced as the first generated token.
pub const DEFAULT_TARGET_LANG: &str = "eng_Latn";
/// Maximum input tokens; longer input is truncated.
pub const DEFAULT_MAX_LENGTH: usize = 250;
/// Beam width for generation.
pub const DEFAULT_NUM_BEAMS: usize = 4;

/// Settings in the `[translator]` section of config.toml.
///
/// Every field is optional; missing values fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorSection {
    pub model_id: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub max_length: Option<usize>,
    pub num_beams: Option<usize>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/kotrans/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub translator: TranslatorSection,
}

/// Resolved, immutable configuration of the translation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub model_id: String,
    pub source_lang: String,
    pub target_lang: String,
    pub max_length: usize,
    pub num_beams: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            num_beams: DEFAULT_NUM_BEAMS,
        }
    }
}

/// Merges config file values over the built-in defaults and validates the result.
///
/// # Errors
///
/// Returns an error if a language tag is unknown, the model id is blank,
/// `max_length` cannot hold any text, or `num_beams` is zero.
pub fn resolve_config(config_file: &ConfigFile) -> Result<TranslatorConfig> {
    let section = &config_file.translator;
    let defaults = TranslatorConfig::default();

    let config = TranslatorConfig {
        model_id: section.model_id.clone().unwrap_or(defaults.model_id),
        source_lang: section.source_lang.clone().unwrap_or(defaults.source_lang),
        target_lang: section.target_lang.clone().unwrap_or(defaults.target_lang),
        max_length: section.max_length.unwrap_or(defaults.max_length),
        num_beams: section.num_beams.unwrap_or(defaults.num_beams),
    };

    if config.model_id.trim().is_empty() {
        bail!("Invalid configuration: 'model_id' must not be empty");
    }
    validate_language(&config.source_lang).context("Invalid 'source_lang'")?;
    validate_language(&config.target_lang).context("Invalid 'target_lang'")?;
    // Room for the language tag and </s> plus at least one piece.
    if config.max_length < 3 {
        bail!(
            "Invalid configuration: 'max_length' must be at least 3 (got {})",
            config.max_length
        );
    }
    if config.num_beams == 0 {
        bail!("Invalid configuration: 'num_beams' must be at least 1");
    }

    Ok(config)
}

/// Locates and reads the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/kotrans/config.toml`
    /// or `~/.config/kotrans/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Creates a config manager for an explicit file.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// Unlike a missing file, an unreadable or malformed one is an error.
    pub fn load_optional(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Ok(_) => self.load(),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ConfigFile::default()),
            Err(e) => Err(anyhow::Error::new(e).context(format!(
                "Failed to access config file: {}",
                self.config_path.display()
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            "[translator]\nmodel_id = \"facebook/nllb-200-distilled-1.3B\"\nmax_length = 120\n",
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(
            loaded.translator.model_id,
            Some("facebook/nllb-200-distilled-1.3B".to_string())
        );
        assert_eq!(loaded.translator.max_length, Some(120));
        assert!(loaded.translator.num_beams.is_none());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        let optional = manager.load_optional().unwrap();
        assert!(optional.translator.model_id.is_none());
    }

    #[test]
    fn test_load_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[translator\nmax_length = ").unwrap();

        assert!(manager.load_optional().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[translator]\nbeam_width = 3\n").unwrap();

        assert!(manager.load().is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = resolve_config(&ConfigFile::default()).unwrap();
        assert_eq!(resolved, TranslatorConfig::default());
        assert_eq!(resolved.max_length, 250);
        assert_eq!(resolved.num_beams, 4);
        assert_eq!(resolved.source_lang, "kor_Hang");
        assert_eq!(resolved.target_lang, "eng_Latn");
    }

    #[test]
    fn test_resolve_rejects_zero_beams() {
        let config = ConfigFile {
            translator: TranslatorSection {
                num_beams: Some(0),
                ..TranslatorSection::default()
            },
        };
        assert!(resolve_config(&config).is_err());
    }

    #[test]
    fn test_resolve_rejects_blank_model() {
        let config = ConfigFile {
            translator: TranslatorSection {
                model_id: Some("  ".to_string()),
                ..TranslatorSection::default()
            },
        };
        assert!(resolve_config(&config).is_err());
    }
}
