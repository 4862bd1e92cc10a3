//! Word-frequency statistics accumulated across imports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use wordspeaker_core::events::{Notice, NoticeCategory};
use wordspeaker_core::types::WordList;

use crate::error::StoreError;
use crate::persist::{self, Loaded};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Case-folded word tokens of `entry`.
pub fn tokenize(entry: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN_RE
        .find_iter(entry)
        .map(|m| m.as_str().to_lowercase())
}

#[derive(Debug)]
pub struct FrequencyStats {
    path: PathBuf,
    counts: BTreeMap<String, u64>,
}

impl FrequencyStats {
    /// Load from `path`, with the same missing/corrupt handling as history.
    pub fn load(path: impl Into<PathBuf>) -> (Self, Option<Notice>) {
        let path = path.into();
        let (counts, notice) = match persist::load_json::<BTreeMap<String, u64>>(&path) {
            Ok(Loaded::Ok(counts)) => {
                info!(path = %path.display(), tokens = counts.len(), "Statistics loaded");
                (counts, None)
            }
            Ok(Loaded::Missing) => (BTreeMap::new(), None),
            Ok(Loaded::Quarantined { moved_to, .. }) => (
                BTreeMap::new(),
                Some(Notice::warning(
                    NoticeCategory::Corruption,
                    format!(
                        "Statistics file was corrupted and has been moved to {}",
                        moved_to.display()
                    ),
                )),
            ),
            Err(e) => (BTreeMap::new(), Some(e.notice())),
        };
        (Self { path, counts }, notice)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count every token of every entry in `words`.
    pub fn record(&mut self, words: &WordList) {
        for entry in words.iter() {
            for token in tokenize(entry) {
                *self.counts.entry(token).or_insert(0) += 1;
            }
        }
    }

    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(&token.to_lowercase()).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent tokens, highest first, ties alphabetical.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
            .collect();
        // BTreeMap iteration is alphabetical and sort_by is stable.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn save(&self) -> Result<(), StoreError> {
        persist::save_json(&self.path, &self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_case_folds_and_splits() {
        let tokens: Vec<String> = tokenize("Ice-Cream, ice cream!").collect();
        assert_eq!(tokens, vec!["ice", "cream", "ice", "cream"]);
        assert_eq!(tokenize("  ").count(), 0);
    }

    #[test]
    fn test_record_and_top() {
        let dir = tempfile::tempdir().unwrap();
        let (mut stats, notice) = FrequencyStats::load(dir.path().join("stats.json"));
        assert!(notice.is_none());

        let list: WordList = ["Apple pie", "apple", "banana split", "cherry"]
            .into_iter()
            .collect();
        stats.record(&list);

        assert_eq!(stats.count("APPLE"), 2);
        assert_eq!(stats.count("pie"), 1);
        assert_eq!(stats.count("durian"), 0);
        assert_eq!(
            stats.top(3),
            vec![("apple", 2), ("banana", 1), ("cherry", 1)]
        );
    }

    #[test]
    fn test_accumulates_across_imports_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let (mut stats, _) = FrequencyStats::load(&path);
        let list: WordList = ["apple", "banana"].into_iter().collect();
        stats.record(&list);
        stats.record(&list);
        stats.save().unwrap();

        let (reloaded, notice) = FrequencyStats::load(&path);
        assert!(notice.is_none());
        assert_eq!(reloaded.count("apple"), 2);
        assert_eq!(reloaded.len(), 2);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["banana"], 2);
    }

    #[test]
    fn test_corrupt_stats_are_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let (stats, notice) = FrequencyStats::load(&path);
        assert!(stats.is_empty());
        assert_eq!(notice.unwrap().category, NoticeCategory::Corruption);
        assert!(!path.exists());
    }
}
