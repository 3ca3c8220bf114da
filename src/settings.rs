use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Replaces the built-in quotes when present
    pub quotes: Option<Vec<String>>,
    pub message: Option<String>,
    #[serde(default)]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Settings {
    /// Load the user's settings; any problem is logged and defaults are used.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file");
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hearttree")
            .join("config.toml")
    }
}
