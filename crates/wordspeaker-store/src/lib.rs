//! WordSpeaker Store crate - word list import and JSON persistence.
//!
//! Imports TXT/CSV word lists, keeps the most-recent-first import history and
//! optional word-frequency statistics on disk. Malformed persisted files are
//! moved aside rather than overwritten.

pub mod error;
pub mod history;
pub mod import;
pub mod persist;
pub mod stats;
pub mod store;

pub use error::StoreError;
pub use history::{History, HistoryEntry};
pub use import::{parse_csv, parse_text, read_word_file};
pub use stats::FrequencyStats;
pub use store::WordStore;
