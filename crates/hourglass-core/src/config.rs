//! Settings file for the host application.
//!
//! Read from `hourglass.toml`; every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::predict::{Anchor, Difficulty};

/// Default config file name
pub const CONFIG_FILE: &str = "hourglass.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub cue: CueConfig,
    pub overlay: OverlayConfig,
    pub session: SessionConfig,
    pub opening: OpeningConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Minimum gap between repeated warnings
    pub repeat_interval_ms: u64,
    pub muted: bool,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            repeat_interval_ms: 3000,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("overlay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("sessions"),
        }
    }
}

/// Anchor assumed before the first confirmed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningConfig {
    pub enabled: bool,
    pub time: i64,
    pub hp: f64,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time: Anchor::OPENING.event_time,
            hp: Anchor::OPENING.hp,
        }
    }
}

impl OpeningConfig {
    pub fn anchor(&self) -> Option<Anchor> {
        self.enabled.then_some(Anchor {
            event_time: self.time,
            hp: self.hp,
        })
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load the file, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Ok(config) => Ok(config),
            Err(e) if e.is_not_found() => {
                warn!(
                    "Config file {} not found, using defaults",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.difficulty, Difficulty::Normal);
        assert_eq!(config.cue.repeat_interval_ms, 3000);
        assert!(!config.overlay.enabled);
        assert_eq!(config.session.dir, PathBuf::from("sessions"));
        assert_eq!(config.opening.anchor(), Some(Anchor::OPENING));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
difficulty = "hard"

[overlay]
enabled = true
dir = "obs"

[opening]
enabled = false
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert!(config.overlay.enabled);
        assert_eq!(config.overlay.dir, PathBuf::from("obs"));
        assert_eq!(config.cue, CueConfig::default());
        assert_eq!(config.opening.anchor(), None);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = \"extreme\"").unwrap();
        let err = Config::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse(_)));
    }
}
