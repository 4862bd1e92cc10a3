use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, WordSpeakerError};
use crate::types::{DictationStyle, LoopMode, OrderMode, PlaybackInterval, SpeechEngineKind, Volume};

/// Top-level configuration for WordSpeaker.
///
/// Loaded from `~/.wordspeaker/config.toml` by default. Every section falls
/// back to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordSpeakerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub dictation: DictationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl WordSpeakerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WordSpeakerConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WordSpeakerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Absolute path of the history file.
    pub fn history_path(&self) -> PathBuf {
        self.general.data_dir_path().join(&self.storage.history_file)
    }

    /// Absolute path of the word-frequency statistics file.
    pub fn stats_path(&self) -> PathBuf {
        self.general.data_dir_path().join(&self.storage.stats_file)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding history and statistics files.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.wordspeaker".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl GeneralConfig {
    /// `data_dir` with a leading `~` expanded to the home directory.
    pub fn data_dir_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

/// Playback defaults applied when the application starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub order: OrderMode,
    pub loop_mode: LoopMode,
    /// Advance to the next word automatically after `interval_secs`.
    pub auto_advance: bool,
    /// Seconds between words. Clamped to 0.5.
    pub interval_secs: f64,
    /// Allow "next" while paused.
    pub allow_manual_while_paused: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            order: OrderMode::InOrder,
            loop_mode: LoopMode::StopAtEnd,
            auto_advance: true,
            interval_secs: PlaybackInterval::DEFAULT_SECS,
            allow_manual_while_paused: false,
        }
    }
}

impl PlaybackConfig {
    pub fn interval(&self) -> PlaybackInterval {
        PlaybackInterval::new(self.interval_secs)
    }
}

/// Text-to-speech configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub engine: SpeechEngineKind,
    /// Explicit engine binary, e.g. "/usr/local/bin/espeak-ng".
    pub binary: Option<String>,
    /// Engine voice identifier. `None` uses the engine default.
    pub voice: Option<String>,
    /// Volume percentage (0-100).
    pub volume: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::Espeak,
            binary: None,
            voice: None,
            volume: 80,
        }
    }
}

impl SpeechConfig {
    pub fn volume(&self) -> Volume {
        Volume::from_percent(self.volume)
    }
}

/// Dictation check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    pub style: DictationStyle,
    /// Render diffs with ANSI colours.
    pub color: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            style: DictationStyle::TypeAndCheck,
            color: true,
        }
    }
}

/// Persistence configuration. File names are relative to `general.data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub history_file: String,
    pub stats_file: String,
    /// Accumulate word-frequency statistics on every import.
    pub track_frequency: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: "history.json".to_string(),
            stats_file: "stats.json".to_string(),
            track_frequency: true,
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var_os(var).map(PathBuf::from)
}
