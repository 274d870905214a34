//! Persistent settings file support.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn default_volume() -> f32 {
    1.0
}

/// User settings loaded from and saved to the settings file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Selected audio input device id
    pub input: Option<String>,

    /// Playback volume, kept within 0..=1
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Last volume above zero, restored on unmute
    #[serde(default = "default_volume")]
    pub positive_volume: f32,

    /// Remembered collection roots
    #[serde(default)]
    pub collections: BTreeSet<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            volume: 1.0,
            positive_volume: 1.0,
            collections: BTreeSet::new(),
        }
    }
}

impl Settings {
    /// Load settings from the default settings file location.
    ///
    /// Returns default settings if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse settings file: {}", path.display()))
    }

    /// Save settings to the default settings file location, creating the
    /// parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create settings directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write settings file: {}", path.display()))
    }

    /// Returns the path to the settings file.
    ///
    /// Default: `~/.config/audiolog/settings.toml`
    pub fn settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("audiolog")
            .join("settings.toml")
    }

    /// Sets the volume, clamped to 0..=1. Any value that lands above zero
    /// is also remembered as the volume to restore after a mute.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.positive_volume = self.volume;
        }
    }

    /// Drops the volume to zero without forgetting the current level.
    pub fn mute(&mut self) {
        self.volume = 0.0;
    }

    /// Restores the last volume that was above zero.
    pub fn restore_volume(&mut self) {
        self.volume = self.positive_volume;
    }

    /// Resolve the collection root, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. First remembered collection
    /// 3. Current working directory
    pub fn collection_root(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.collections.iter().next().cloned())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
