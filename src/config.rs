//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tagpath\config.toml
//! - macOS: ~/Library/Application Support/tagpath/config.toml
//! - Linux: ~/.config/tagpath/config.toml
//!
//! The config file is human-readable and editable. A missing or broken
//! file never stops the tool; defaults are used instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::legalize::{
    FilesystemLimit, FixedLimit, LengthOracle, Legalizer, Platform, Replacement,
};
use crate::error::ResultExt;
use crate::organizer::DEFAULT_PATTERN;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path legalization settings
    pub paths: PathsConfig,
}

/// Path legalization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Target platform (unset = the running OS)
    pub platform: Option<Platform>,

    /// Maximum filename length in bytes (0 = probe the filesystem)
    pub max_filename_length: usize,

    /// Directory whose filesystem is probed for the name length
    pub directory: PathBuf,

    /// Destination pattern for `preview`
    pub pattern: String,

    /// Primary replacement rules
    pub replace: Vec<ReplaceEntry>,

    /// Rules tried when the primary ones leave a path too long
    pub alternate: Vec<ReplaceEntry>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            platform: None,
            max_filename_length: 0,
            directory: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            replace: Vec::new(),
            alternate: Vec::new(),
        }
    }
}

/// One `pattern` → `with` rule as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceEntry {
    pub pattern: String,
    #[serde(default)]
    pub with: String,
}

impl ReplaceEntry {
    pub fn new(pattern: impl Into<String>, with: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            with: with.into(),
        }
    }

    pub fn compile(&self) -> crate::error::Result<Replacement> {
        Replacement::new(&self.pattern, self.with.as_str())
    }
}

fn compile_all(table: &str, entries: &[ReplaceEntry]) -> crate::error::Result<Vec<Replacement>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .compile()
                .with_context(format!("paths.{table} rule #{}", i + 1))
        })
        .collect()
}

impl PathsConfig {
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_default()
    }

    /// Fixed limit when configured, otherwise a filesystem probe.
    pub fn length_oracle(&self) -> Box<dyn LengthOracle + Send + Sync> {
        if self.max_filename_length > 0 {
            Box::new(FixedLimit(self.max_filename_length))
        } else {
            Box::new(FilesystemLimit::new(&self.directory))
        }
    }

    pub fn legalizer(&self) -> Legalizer<Box<dyn LengthOracle + Send + Sync>> {
        Legalizer::new(self.platform(), self.length_oracle())
    }

    pub fn replacements(&self) -> crate::error::Result<Vec<Replacement>> {
        compile_all("replace", &self.replace)
    }

    pub fn alternate_replacements(&self) -> crate::error::Result<Vec<Replacement>> {
        compile_all("alternate", &self.alternate)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagpath"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the standard location
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("pattern"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.paths.platform = Some(Platform::Windows);
        config.paths.max_filename_length = 120;
        config.paths.replace.push(ReplaceEntry::new("^The ", ""));

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.paths, config.paths);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[paths]
max_filename_length = 64

[[paths.replace]]
pattern = "[àá]"
with = "a"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.paths.max_filename_length, 64);
        assert_eq!(config.paths.replace, vec![ReplaceEntry::new("[àá]", "a")]);

        // Other fields use defaults
        assert_eq!(config.paths.platform, None);
        assert_eq!(config.paths.pattern, DEFAULT_PATTERN);
        assert!(config.paths.alternate.is_empty());
    }

    #[test]
    fn test_length_oracle_prefers_fixed_limit() {
        let paths = PathsConfig {
            max_filename_length: 42,
            ..Default::default()
        };
        assert_eq!(paths.length_oracle().max_filename_length(), 42);
        assert_eq!(paths.legalizer().max_filename_length(), 42);
    }

    #[test]
    fn test_invalid_rule_is_reported() {
        let paths = PathsConfig {
            alternate: vec![ReplaceEntry::new("a", "b"), ReplaceEntry::new("(", "_")],
            ..Default::default()
        };
        assert!(paths.replacements().unwrap().is_empty());

        let err = paths.alternate_replacements().unwrap_err();
        assert!(err.to_string().starts_with("paths.alternate rule #2"));
        assert!(matches!(
            err,
            crate::error::Error::WithContext { ref source, .. }
                if matches!(**source, crate::error::Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.paths.alternate.push(ReplaceEntry::new(" feat\\. .*", ""));
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.paths, config.paths);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths\nmax_filename_length = ").unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.paths, PathsConfig::default());
    }
}
