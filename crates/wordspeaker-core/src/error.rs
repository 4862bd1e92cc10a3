use thiserror::Error;

/// Top-level error type for WordSpeaker.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for WordSpeakerError` so
/// that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordSpeakerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Dictation error: {0}")]
    Dictation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid value: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for WordSpeakerError {
    fn from(err: toml::de::Error) -> Self {
        WordSpeakerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for WordSpeakerError {
    fn from(err: toml::ser::Error) -> Self {
        WordSpeakerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for WordSpeakerError {
    fn from(err: serde_json::Error) -> Self {
        WordSpeakerError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for WordSpeaker operations.
pub type Result<T> = std::result::Result<T, WordSpeakerError>;
