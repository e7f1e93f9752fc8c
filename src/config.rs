//! Configuration file parser for ~/.config/trailhead/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged, since they are
//! usually typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::page::Page;
use crate::trails::DataLocation;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL or path of the trail JSON. `None` means `data/trails.json`.
    pub data_location: Option<String>,

    /// Timeout for the trail data request, in seconds.
    pub request_timeout_secs: u64,

    /// Pause after the last search keystroke before filtering, in ms.
    pub search_debounce_ms: u64,

    /// How long "Saved!" confirmations stay up, in ms.
    pub confirmation_ms: u64,

    /// Delay between hiding the detail modal and discarding it, in ms.
    pub modal_close_ms: u64,

    /// Page shown when `--page` is not given.
    pub default_page: Page,

    /// Theme variant name ("dark" or "light").
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_location: None,
            request_timeout_secs: 10,
            search_debounce_ms: 300,
            confirmation_ms: 2000,
            modal_close_ms: 300,
            default_page: Page::Trails,
            theme: "dark".to_string(),
        }
    }
}

/// Durations derived from the config, handed to the components that time things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub confirmation: Duration,
    pub modal_close: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Config::default().timings()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// A zero timeout would fail every request immediately.
    const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

    const KNOWN_KEYS: [&'static str; 7] = [
        "data_location",
        "request_timeout_secs",
        "search_debounce_ms",
        "confirmation_ms",
        "modal_close_ms",
        "default_page",
        "theme",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a corrupted file cannot exhaust memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(&content)?;
        if config.request_timeout_secs < Self::MIN_REQUEST_TIMEOUT_SECS {
            tracing::warn!(
                value = config.request_timeout_secs,
                min = Self::MIN_REQUEST_TIMEOUT_SECS,
                "request_timeout_secs too small, raising to minimum"
            );
            config.request_timeout_secs = Self::MIN_REQUEST_TIMEOUT_SECS;
        }
        tracing::info!(
            path = %path.display(),
            page = %config.default_page,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The configured data location, or the default relative path.
    pub fn data_location(&self) -> DataLocation {
        self.data_location
            .as_deref()
            .map(DataLocation::parse)
            .unwrap_or_default()
    }

    pub fn timings(&self) -> Timings {
        Timings {
            request_timeout: Duration::from_secs(
                self.request_timeout_secs.max(Self::MIN_REQUEST_TIMEOUT_SECS),
            ),
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            confirmation: Duration::from_millis(self.confirmation_ms),
            modal_close: Duration::from_millis(self.modal_close_ms),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("trailhead_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_location, None);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.confirmation_ms, 2000);
        assert_eq!(config.modal_close_ms, 300);
        assert_eq!(config.default_page, Page::Trails);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.data_location(), DataLocation::default());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/trailhead_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let (dir, path) = write_config("empty", "   \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_page, Page::Trails);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let (dir, path) = write_config(
            "full",
            r#"
data_location = "https://example.com/data/trails.json"
request_timeout_secs = 5
search_debounce_ms = 150
confirmation_ms = 1000
modal_close_ms = 0
default_page = "favorites"
theme = "light"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert!(matches!(config.data_location(), DataLocation::Url(_)));
        assert_eq!(config.default_page, Page::Favorites);
        assert_eq!(config.theme, "light");

        let timings = config.timings();
        assert_eq!(timings.request_timeout, Duration::from_secs(5));
        assert_eq!(timings.search_debounce, Duration::from_millis(150));
        assert_eq!(timings.confirmation, Duration::from_millis(1000));
        assert_eq!(timings.modal_close, Duration::ZERO);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "default_page = \"home\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_page, Page::Home);
        assert_eq!(config.search_debounce_ms, 300);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_raised_to_minimum() {
        let (dir, path) = write_config("zero_timeout", "request_timeout_secs = 0\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.timings().request_timeout, Duration::from_secs(1));
        std::fs::remove_dir_all(&dir).ok();

        let direct = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(direct.timings().request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_page_is_error() {
        let (dir, path) = write_config("bad_page", "default_page = \"weather\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\nnewsletter = true\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
