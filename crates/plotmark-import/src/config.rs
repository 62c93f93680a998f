//! Import configuration.
//!
//! Settings can be loaded from:
//! - a TOML file (default: ~/.config/plotmark/import.toml, `[import]` table)
//! - environment variables (`PLOTMARK_*`)
//!
//! # Example
//!
//! ```rust,no_run
//! use plotmark_import::config::ImportConfig;
//!
//! // Load from the default path or fall back to env vars
//! let config = ImportConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = ImportConfig::from_file(std::path::Path::new("import.toml")).expect("Failed to load");
//!
//! let options = config.to_options();
//! ```

use crate::pipeline::ImportOptions;
use plotmark_core::defaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Import settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Snap imported colors to the palette.
    pub standardize_colors: bool,
    /// Largest accepted upload in bytes.
    pub max_file_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            standardize_colors: defaults::STANDARDIZE_COLORS,
            max_file_bytes: defaults::MAX_FILE_BYTES,
        }
    }
}

impl ImportConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/plotmark/import.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push(defaults::CONFIG_DIR_NAME);
        path.push(defaults::CONFIG_FILE_NAME);
        path
    }

    /// Load from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!(
                subsystem = "config",
                path = %path.display(),
                "Loading import config"
            );
            Self::from_file(&path)
        } else {
            debug!(
                subsystem = "config",
                path = %path.display(),
                "Config file not found, using environment variables"
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// Keys live under an `[import]` table; a missing table or key takes
    /// its default.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;

        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            import: ImportConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        root.import.validate()?;
        Ok(root.import)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(defaults::ENV_STANDARDIZE_COLORS) {
            match parse_flag(&raw) {
                Some(value) => config.standardize_colors = value,
                None => warn!(
                    subsystem = "config",
                    var = defaults::ENV_STANDARDIZE_COLORS,
                    value = %raw,
                    "Ignoring unrecognized boolean"
                ),
            }
        }

        if let Some(raw) = lookup(defaults::ENV_MAX_FILE_BYTES) {
            match raw.trim().parse() {
                Ok(value) => config.max_file_bytes = value,
                Err(_) => warn!(
                    subsystem = "config",
                    var = defaults::ENV_MAX_FILE_BYTES,
                    value = %raw,
                    "Ignoring non-numeric size limit"
                ),
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_file_bytes == 0 {
            return Err(ConfigError::Validation(
                "max_file_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_options(&self) -> ImportOptions {
        ImportOptions {
            standardize_colors: self.standardize_colors,
            max_file_bytes: self.max_file_bytes,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert!(!config.standardize_colors);
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.to_options(), ImportOptions::default());
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        let path = ImportConfig::default_config_path();
        assert!(path.ends_with("plotmark/import.toml"));
    }

    #[test]
    fn test_from_file() {
        let file = write_config("[import]\nstandardize_colors = true\nmax_file_bytes = 2048\n");
        let config = ImportConfig::from_file(file.path()).unwrap();
        assert!(config.standardize_colors);
        assert_eq!(config.max_file_bytes, 2048);
    }

    #[test]
    fn test_from_file_partial_table_uses_defaults() {
        let file = write_config("[import]\nstandardize_colors = true\n");
        let config = ImportConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_file_bytes, defaults::MAX_FILE_BYTES);

        let file = write_config("# nothing configured\n");
        assert_eq!(
            ImportConfig::from_file(file.path()).unwrap(),
            ImportConfig::default()
        );
    }

    #[test]
    fn test_from_file_errors() {
        let file = write_config("[import]\nmax_file_bytes = \"big\"\n");
        assert!(matches!(
            ImportConfig::from_file(file.path()),
            Err(ConfigError::TomlParse(_))
        ));

        let file = write_config("[import]\nmax_file_bytes = 0\n");
        assert!(matches!(
            ImportConfig::from_file(file.path()),
            Err(ConfigError::Validation(_))
        ));

        assert!(matches!(
            ImportConfig::from_file(Path::new("/nonexistent/plotmark/import.toml")),
            Err(ConfigError::FileRead(_))
        ));
    }

    #[test]
    fn test_from_env_with() {
        let config = ImportConfig::from_env_with(env(&[
            ("PLOTMARK_STANDARDIZE_COLORS", "yes"),
            ("PLOTMARK_MAX_FILE_BYTES", "4096"),
        ]));
        assert!(config.standardize_colors);
        assert_eq!(config.max_file_bytes, 4096);
    }

    #[test]
    fn test_from_env_ignores_garbage() {
        let config = ImportConfig::from_env_with(env(&[
            ("PLOTMARK_STANDARDIZE_COLORS", "maybe"),
            ("PLOTMARK_MAX_FILE_BYTES", "ten megs"),
        ]));
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
