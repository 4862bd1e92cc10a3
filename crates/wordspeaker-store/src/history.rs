//! Import history: most-recent-first, one entry per absolute path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use wordspeaker_core::events::{Notice, NoticeCategory};

use crate::error::StoreError;
use crate::persist::{self, Loaded};

/// Timestamp format written by earlier releases.
const LEGACY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Absolute path of the imported file.
    pub path: PathBuf,
    /// File name shown in listings.
    pub name: String,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(path: PathBuf, time: DateTime<Utc>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, time }
    }

    /// `YYYY-MM-DD HH:MM`, as shown in listings.
    pub fn display_time(&self) -> String {
        self.time.format(LEGACY_TIME_FORMAT).to_string()
    }
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(time) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, LEGACY_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// The persisted import history.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load history from `path`.
    ///
    /// A missing file is an empty history. A malformed one is moved aside and
    /// reported in the returned notice; an unreadable one is reported and
    /// left in place.
    pub fn load(path: impl Into<PathBuf>) -> (Self, Option<Notice>) {
        let path = path.into();
        let (entries, notice) = match persist::load_json::<Vec<HistoryEntry>>(&path) {
            Ok(Loaded::Ok(entries)) => {
                info!(path = %path.display(), count = entries.len(), "History loaded");
                (entries, None)
            }
            Ok(Loaded::Missing) => (Vec::new(), None),
            Ok(Loaded::Quarantined { moved_to, .. }) => (
                Vec::new(),
                Some(Notice::warning(
                    NoticeCategory::Corruption,
                    format!(
                        "History file was corrupted and has been moved to {}",
                        moved_to.display()
                    ),
                )),
            ),
            Err(e) => (Vec::new(), Some(e.notice())),
        };
        (Self { path, entries }, notice)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&HistoryEntry, StoreError> {
        self.entries.get(index).ok_or(StoreError::HistoryIndex {
            index,
            len: self.entries.len(),
        })
    }

    /// Move `path` to the front with timestamp `time`, dropping any older
    /// entry for the same path. `path` must already be absolute.
    pub fn record(&mut self, path: PathBuf, time: DateTime<Utc>) {
        self.entries.retain(|e| e.path != path);
        self.entries.insert(0, HistoryEntry::new(path, time));
    }

    pub fn save(&self) -> Result<(), StoreError> {
        persist::save_json(&self.path, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_record_dedups_and_moves_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let (mut history, notice) = History::load(dir.path().join("history.json"));
        assert!(notice.is_none());
        assert!(history.is_empty());

        let p = PathBuf::from("/lists/week1.txt");
        let q = PathBuf::from("/lists/week2.csv");
        history.record(p.clone(), at(100));
        history.record(q.clone(), at(200));
        history.record(p.clone(), at(300));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].path, p);
        assert_eq!(history.entries()[0].time, at(300));
        assert_eq!(history.entries()[0].name, "week1.txt");
        assert_eq!(history.entries()[1].path, q);
    }

    #[test]
    fn test_same_path_twice_keeps_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (mut history, _) = History::load(dir.path().join("history.json"));
        let p = PathBuf::from("/lists/p.txt");
        history.record(p.clone(), at(10));
        history.record(p.clone(), at(20));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].time, at(20));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let (mut history, _) = History::load(&path);
        history.record(PathBuf::from("/a.txt"), at(1_700_000_000));
        history.save().unwrap();

        let (reloaded, notice) = History::load(&path);
        assert!(notice.is_none());
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_legacy_time_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[{"path": "/w/words.txt", "name": "words.txt", "time": "2024-03-01 09:30"}]"#,
        )
        .unwrap();

        let (history, notice) = History::load(&path);
        assert!(notice.is_none());
        assert_eq!(history.entries()[0].display_time(), "2024-03-01 09:30");
    }

    #[test]
    fn test_corrupt_history_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let (history, notice) = History::load(&path);
        assert!(history.is_empty());
        let notice = notice.unwrap();
        assert_eq!(notice.category, NoticeCategory::Corruption);
        assert!(!path.exists());

        let moved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(moved.len(), 1);
        assert!(moved[0].starts_with("history.json.corrupt-"));
    }

    #[test]
    fn test_get_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let (history, _) = History::load(dir.path().join("history.json"));
        assert!(matches!(
            history.get(0),
            Err(StoreError::HistoryIndex { index: 0, len: 0 })
        ));
    }
}
