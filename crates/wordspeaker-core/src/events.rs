//! User-visible notices.
//!
//! Every recoverable error in WordSpeaker ends up as a [`Notice`]: a
//! non-blocking message the interface layer shows without interrupting
//! playback. Notices never carry control flow; the operation that raised one
//! has already been aborted or completed by the time it is displayed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Where a notice came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    /// No selection, empty list, invalid value, wrong state.
    UserInput,
    /// Missing or unreadable files.
    Io,
    /// A persisted file was malformed and moved aside.
    Corruption,
    /// The speech engine failed.
    Speech,
    /// A playback session ran to the end.
    Completion,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub category: NoticeCategory,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, category: NoticeCategory, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            message: message.into(),
        }
    }

    pub fn info(category: NoticeCategory, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, category, message)
    }

    pub fn warning(category: NoticeCategory, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, category, message)
    }

    pub fn error(category: NoticeCategory, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, category, message)
    }

    /// Title used when the notice is shown, e.g. "Info" or "Speech Error".
    pub fn title(&self) -> &'static str {
        match (self.level, self.category) {
            (NoticeLevel::Error, NoticeCategory::Speech) => "Speech Error",
            (NoticeLevel::Error, _) => "Error",
            (NoticeLevel::Warning, _) => "Warning",
            (NoticeLevel::Info, NoticeCategory::Completion) => "Done",
            (NoticeLevel::Info, _) => "Info",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.title(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let n = Notice::info(NoticeCategory::UserInput, "Please import words first.");
        assert_eq!(n.level, NoticeLevel::Info);
        assert_eq!(n.category, NoticeCategory::UserInput);
        assert_eq!(n.message, "Please import words first.");

        let n = Notice::warning(NoticeCategory::Corruption, "moved aside");
        assert_eq!(n.level, NoticeLevel::Warning);

        let n = Notice::error(NoticeCategory::Speech, "driver gone");
        assert_eq!(n.level, NoticeLevel::Error);
    }

    #[test]
    fn test_notice_display() {
        let n = Notice::error(NoticeCategory::Speech, "Error: no audio device");
        assert_eq!(n.to_string(), "[Speech Error] Error: no audio device");

        let n = Notice::info(NoticeCategory::Io, "File not found or moved.");
        assert_eq!(n.to_string(), "[Info] File not found or moved.");

        let n = Notice::info(NoticeCategory::Completion, "Completed");
        assert_eq!(n.title(), "Done");
    }

    #[test]
    fn test_notice_serialization() {
        let n = Notice::warning(NoticeCategory::Corruption, "x");
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"corruption\""));
        assert!(json.contains("\"warning\""));
    }
}
