use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ui::theme::DEFAULT_THEME;

const MAX_DEBOUNCE_MS: u64 = 2000;
const MIN_TICK_MS: u64 = 5;
const MAX_TICK_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Newline-separated word list to use instead of the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_list: Option<PathBuf>,
    #[serde(default = "default_remember_last_query")]
    pub remember_last_query: bool,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}
fn default_debounce_ms() -> u64 {
    150
}
fn default_tick_ms() -> u64 {
    25
}
fn default_remember_last_query() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            debounce_ms: default_debounce_ms(),
            tick_ms: default_tick_ms(),
            word_list: None,
            remember_last_query: default_remember_last_query(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_or_init(&Self::config_path())
    }

    /// Like [`Config::load_from`], but a missing file is created with the
    /// defaults so users have something to edit. A failed write is not fatal.
    pub fn load_or_init(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Config::default();
        match config.save_to(path) {
            Ok(()) => info!(path = %path.display(), "wrote default config"),
            Err(err) => warn!(path = %path.display(), %err, "could not write default config"),
        }
        Ok(config)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rackr")
            .join("config.toml")
    }

    /// Clamp timing values into a usable range.
    pub fn validate(&mut self) {
        self.debounce_ms = self.debounce_ms.min(MAX_DEBOUNCE_MS);
        self.tick_ms = self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert!(config.remember_last_query);
        assert!(config.word_list.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "midnight"
word_list = "/usr/share/dict/words"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "midnight");
        assert_eq!(config.word_list, Some(PathBuf::from("/usr/share/dict/words")));
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.tick_ms, 25);
    }

    #[test]
    fn test_config_validate_clamps_values() {
        let mut config = Config {
            debounce_ms: 10_000,
            tick_ms: 0,
            theme: "  ".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.debounce_ms, MAX_DEBOUNCE_MS);
        assert_eq!(config.tick_ms, MIN_TICK_MS);
        assert_eq!(config.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            debounce_ms: 300,
            remember_last_query: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_first_load_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rackr").join("config.toml");

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        fs::write(&path, "debounce_ms = 40\n").unwrap();
        assert_eq!(Config::load_or_init(&path).unwrap().debounce_ms, 40);
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
