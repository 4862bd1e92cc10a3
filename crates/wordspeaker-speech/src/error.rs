//! Error types for speech synthesis.

use wordspeaker_core::error::WordSpeakerError;

/// Errors from speech engines and the gateway.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("Speech engine not available: {engine}")]
    EngineUnavailable { engine: String },

    #[error("Failed to start {engine}: {source}")]
    SpawnFailed {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write text to {engine}")]
    StdinWrite { engine: String },

    #[error("{engine} failed: {stderr}")]
    ProcessFailed { engine: String, stderr: String },

    #[error("Voice enumeration failed for {engine}: {message}")]
    VoiceEnumeration { engine: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for WordSpeakerError {
    fn from(err: SpeechError) -> Self {
        WordSpeakerError::Speech(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::EngineUnavailable {
            engine: "espeak-ng".to_string(),
        };
        assert_eq!(err.to_string(), "Speech engine not available: espeak-ng");

        let err = SpeechError::ProcessFailed {
            engine: "say".to_string(),
            stderr: "voice not found".to_string(),
        };
        assert_eq!(err.to_string(), "say failed: voice not found");

        let err = SpeechError::SpawnFailed {
            engine: "espeak".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("Failed to start espeak"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_speech_error_into_wordspeaker_error() {
        let err = SpeechError::StdinWrite {
            engine: "espeak".to_string(),
        };
        let converted: WordSpeakerError = err.into();
        assert!(matches!(converted, WordSpeakerError::Speech(_)));
        assert!(converted.to_string().contains("espeak"));
    }
}
