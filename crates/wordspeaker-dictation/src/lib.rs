//! WordSpeaker Dictation crate - answer checking and example sentences.
//!
//! Aligns what the user typed against the expected word character by
//! character (case-insensitive), tags each span as equal, wrong, missing or
//! extra, and renders the result for the terminal.

pub mod checker;
pub mod diff;
pub mod error;
pub mod render;
pub mod sentences;

pub use checker::{check, DictationChecker, DiffResult, Span, SpanTag};
pub use diff::align;
pub use error::DictationError;
pub use render::{render, Palette};
pub use sentences::{SentenceGenerator, SentenceLevel};
