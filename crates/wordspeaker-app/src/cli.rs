//! CLI argument definitions for the WordSpeaker binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use wordspeaker_core::config::WordSpeakerConfig;
use wordspeaker_core::error::Result;
use wordspeaker_core::types::SpeechEngineKind;

/// WordSpeaker: reads a word list aloud and checks your spelling.
#[derive(Parser, Debug, Default)]
#[command(name = "wordspeaker", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory for the history and statistics files.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Speech engine (espeak, say, silent).
    #[arg(short = 'e', long = "engine")]
    pub engine: Option<String>,

    /// Render diffs without ANSI colours.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Word list to import on startup.
    pub import: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WORDSPEAKER_CONFIG env var > platform default
    /// (~/.wordspeaker/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("WORDSPEAKER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Returns `None` if not overridden; the caller then tries `RUST_LOG` and
    /// the config file value.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Resolve the speech engine.
    ///
    /// Priority: --engine flag > config file value.
    pub fn resolve_engine(&self, config_engine: SpeechEngineKind) -> Result<SpeechEngineKind> {
        match self.engine {
            Some(ref name) => name.parse(),
            None => Ok(config_engine),
        }
    }

    /// Apply flag overrides to a loaded configuration.
    pub fn apply(&self, config: &mut WordSpeakerConfig) -> Result<()> {
        if let Some(ref dir) = self.data_dir {
            config.general.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(level) = self.resolve_log_level() {
            config.general.log_level = level;
        }
        config.speech.engine = self.resolve_engine(config.speech.engine)?;
        if self.no_color {
            config.dictation.color = false;
        }
        Ok(())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".wordspeaker").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".wordspeaker").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "wordspeaker",
            "--engine",
            "silent",
            "-d",
            "/tmp/ws",
            "--no-color",
            "words.txt",
        ]);
        assert_eq!(args.engine.as_deref(), Some("silent"));
        assert_eq!(args.import, Some(PathBuf::from("words.txt")));

        let mut config = WordSpeakerConfig::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.speech.engine, SpeechEngineKind::Silent);
        assert_eq!(config.general.data_dir, "/tmp/ws");
        assert!(!config.dictation.color);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs {
            config: Some(PathBuf::from("/etc/ws.toml")),
            ..Default::default()
        };
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/ws.toml"));
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let args = CliArgs {
            engine: Some("festival".to_string()),
            ..Default::default()
        };
        assert!(args.apply(&mut WordSpeakerConfig::default()).is_err());
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = WordSpeakerConfig::default();
        config.speech.engine = SpeechEngineKind::Say;
        CliArgs::default().apply(&mut config).unwrap();
        assert_eq!(config.speech.engine, SpeechEngineKind::Say);
        assert_eq!(config.general.data_dir, "~/.wordspeaker");
    }
}
