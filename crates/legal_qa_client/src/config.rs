//! Client config load/save for `~/.legal-qa/config.yaml`.
//! Sections: `server.*` (backend location) and `ui.*` (display defaults).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::messages::AnswerStyle;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_NOTIFICATION_MS: u64 = 5000;

/// Server section (base_url, timeout_secs).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// UI section (answer_style, notification_ms, auto_scroll, color, preferences_path).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_style: Option<AnswerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scroll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<PathBuf>,
}

/// Full config file.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ui: UiSection,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.ui.notification_ms.unwrap_or(DEFAULT_NOTIFICATION_MS))
    }

    pub fn answer_style(&self) -> AnswerStyle {
        self.ui.answer_style.unwrap_or_default()
    }

    pub fn auto_scroll(&self) -> bool {
        self.ui.auto_scroll.unwrap_or(true)
    }

    pub fn color(&self) -> bool {
        self.ui.color.unwrap_or(true)
    }

    /// Where the theme preference lives: the configured override, else
    /// `~/.legal-qa/preferences.yaml`.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.ui
            .preferences_path
            .clone()
            .or_else(default_preferences_path)
    }
}

/// Returns the default config file path: `~/.legal-qa/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".legal-qa").join("config.yaml"))
}

/// Returns the default preference file path: `~/.legal-qa/preferences.yaml`.
pub fn default_preferences_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".legal-qa").join("preferences.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
