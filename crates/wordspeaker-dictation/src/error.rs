use wordspeaker_core::error::WordSpeakerError;
use wordspeaker_core::events::{Notice, NoticeCategory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DictationError {
    #[error("No current word yet.")]
    NoCurrentWord,

    #[error("Checking is off in Paper Only mode.")]
    PaperMode,
}

impl DictationError {
    pub fn notice(&self) -> Notice {
        Notice::info(NoticeCategory::UserInput, self.to_string())
    }
}

impl From<DictationError> for WordSpeakerError {
    fn from(err: DictationError) -> Self {
        WordSpeakerError::Dictation(err.to_string())
    }
}
