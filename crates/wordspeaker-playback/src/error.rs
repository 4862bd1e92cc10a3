//! Error types for playback control.

use wordspeaker_core::error::WordSpeakerError;
use wordspeaker_core::events::{Notice, NoticeCategory};
use wordspeaker_core::types::PlaybackStatus;

/// A rejected playback command. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("Please import words first.")]
    EmptyWordList,

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: PlaybackStatus,
        action: &'static str,
    },

    #[error("Next is disabled while paused.")]
    ManualAdvanceWhilePaused,

    #[error("No current word yet.")]
    NoCurrentWord,

    #[error("No word {index} ({len} words)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl PlaybackError {
    pub fn notice(&self) -> Notice {
        Notice::info(NoticeCategory::UserInput, self.to_string())
    }
}

impl From<PlaybackError> for WordSpeakerError {
    fn from(err: PlaybackError) -> Self {
        WordSpeakerError::Playback(err.to_string())
    }
}
