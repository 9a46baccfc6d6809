//! Persisted display preferences (`~/.legal-qa/preferences.yaml`).
//! Only the theme survives restarts; everything else is per-run state.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// File-backed preference store. A store without a path keeps nothing.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
}

impl PreferenceStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Saved theme, if one was ever stored. A missing file is not an error.
    pub fn theme(&self) -> Result<Option<Theme>, PreferencesError> {
        Ok(self.load()?.theme)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), PreferencesError> {
        let mut prefs = self.load()?;
        prefs.theme = Some(theme);
        self.save(&prefs)
    }

    fn load(&self) -> Result<Preferences, PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(Preferences::default());
        };
        match std::fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Preferences::default()),
            Ok(contents) => Ok(serde_yaml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_yaml::to_string(prefs)?)?;
        Ok(())
    }
}
