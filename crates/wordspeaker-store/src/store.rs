//! The word store: current word list plus persisted history and statistics.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use wordspeaker_core::config::WordSpeakerConfig;
use wordspeaker_core::events::Notice;
use wordspeaker_core::types::WordList;

use crate::error::StoreError;
use crate::history::{History, HistoryEntry};
use crate::import::read_word_file;
use crate::stats::FrequencyStats;

pub struct WordStore {
    words: WordList,
    history: History,
    stats: Option<FrequencyStats>,
    notices: Vec<Notice>,
}

impl WordStore {
    /// Open the store. `stats_path` is `None` when frequency tracking is
    /// disabled. Load problems are queued as notices.
    pub fn open(history_path: impl Into<PathBuf>, stats_path: Option<PathBuf>) -> Self {
        let mut notices = Vec::new();
        let (history, notice) = History::load(history_path);
        notices.extend(notice);

        let stats = stats_path.map(|path| {
            let (stats, notice) = FrequencyStats::load(path);
            notices.extend(notice);
            stats
        });

        Self {
            words: WordList::default(),
            history,
            stats,
            notices,
        }
    }

    pub fn from_config(config: &WordSpeakerConfig) -> Self {
        let stats_path = config
            .storage
            .track_frequency
            .then(|| config.stats_path());
        Self::open(config.history_path(), stats_path)
    }

    /// Import a word list, replacing the current one.
    ///
    /// On error nothing changes. A failure to persist history or statistics
    /// afterwards does not fail the import; it is queued as a notice.
    pub fn load(&mut self, path: &Path) -> Result<WordList, StoreError> {
        let words = read_word_file(path)?;
        let absolute = std::fs::canonicalize(path).map_err(|e| StoreError::read(path, e))?;

        info!(path = %absolute.display(), count = words.len(), "Word list imported");
        self.words = words.clone();

        self.history.record(absolute, Utc::now());
        if let Err(e) = self.history.save() {
            warn!(path = %self.history.path().display(), error = %e, "Failed to save history");
            self.notices.push(e.notice());
        }

        if let Some(stats) = self.stats.as_mut() {
            stats.record(&words);
            if let Err(e) = stats.save() {
                warn!(path = %stats.path().display(), error = %e, "Failed to save statistics");
                self.notices.push(e.notice());
            }
        }

        Ok(words)
    }

    /// Re-import history entry `index` (0 = most recent).
    pub fn open_history(&mut self, index: usize) -> Result<WordList, StoreError> {
        let path = self.history.get(index)?.path.clone();
        if !path.exists() {
            return Err(StoreError::NotFound { path });
        }
        self.load(&path)
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn stats(&self) -> Option<&FrequencyStats> {
        self.stats.as_ref()
    }

    pub fn clear(&mut self) {
        self.words = WordList::default();
    }

    /// Notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
