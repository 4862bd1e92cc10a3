//! Error types for the word store.

use std::path::PathBuf;

use wordspeaker_core::error::WordSpeakerError;
use wordspeaker_core::events::{Notice, NoticeCategory};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Unsupported file type: {} (expected .txt or .csv)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("File not found or moved: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No history entry {index} ({len} entries)")]
    HistoryIndex { index: usize, len: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Build an I/O error, mapping `NotFound` to its own variant.
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound { path }
        } else {
            StoreError::Read { path, source }
        }
    }

    /// The notice shown to the user for this error.
    pub fn notice(&self) -> Notice {
        match self {
            StoreError::UnsupportedFormat { .. } | StoreError::HistoryIndex { .. } => {
                Notice::info(NoticeCategory::UserInput, self.to_string())
            }
            StoreError::NotFound { .. } => {
                Notice::info(NoticeCategory::Io, "File not found or moved.")
            }
            StoreError::Read { .. } | StoreError::Write { .. } | StoreError::Serialization(_) => {
                Notice::error(NoticeCategory::Io, self.to_string())
            }
        }
    }
}

impl From<StoreError> for WordSpeakerError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::HistoryIndex { .. } => WordSpeakerError::History(err.to_string()),
            StoreError::Serialization(e) => WordSpeakerError::Serialization(e.to_string()),
            _ => WordSpeakerError::Import(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordspeaker_core::events::NoticeLevel;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::UnsupportedFormat {
            path: PathBuf::from("/w/words.json"),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type: /w/words.json (expected .txt or .csv)"
        );

        let err = StoreError::HistoryIndex { index: 4, len: 2 };
        assert_eq!(err.to_string(), "No history entry 4 (2 entries)");
    }

    #[test]
    fn test_read_maps_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StoreError::read("/x.txt", io),
            StoreError::NotFound { .. }
        ));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            StoreError::read("/x.txt", io),
            StoreError::Read { .. }
        ));
    }

    #[test]
    fn test_notice_categories() {
        let n = StoreError::NotFound {
            path: PathBuf::from("/gone.txt"),
        }
        .notice();
        assert_eq!(n.category, NoticeCategory::Io);
        assert_eq!(n.message, "File not found or moved.");

        let n = StoreError::HistoryIndex { index: 9, len: 1 }.notice();
        assert_eq!(n.category, NoticeCategory::UserInput);
        assert_eq!(n.level, NoticeLevel::Info);
    }

    #[test]
    fn test_into_wordspeaker_error() {
        let err: WordSpeakerError = StoreError::HistoryIndex { index: 1, len: 0 }.into();
        assert!(matches!(err, WordSpeakerError::History(_)));

        let err: WordSpeakerError = StoreError::UnsupportedFormat {
            path: PathBuf::from("a.doc"),
        }
        .into();
        assert!(matches!(err, WordSpeakerError::Import(_)));
    }
}
