use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WordSpeakerError;

// =============================================================================
// Enums
// =============================================================================

/// Traversal order for a playback session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Word-list order, optionally rotated to start at a selected word.
    #[default]
    InOrder,
    /// Shuffled, with no repeats within one full cycle.
    Random,
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::InOrder => write!(f, "In order"),
            OrderMode::Random => write!(f, "Random (no repeat)"),
        }
    }
}

impl FromStr for OrderMode {
    type Err = WordSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in-order" | "in_order" | "inorder" | "order" | "ordered" | "sequential" => {
                Ok(OrderMode::InOrder)
            }
            "random" | "shuffle" => Ok(OrderMode::Random),
            other => Err(WordSpeakerError::Validation(format!(
                "unknown order mode '{}' (expected in-order or random)",
                other
            ))),
        }
    }
}

/// What happens when playback reaches the end of the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Regenerate the queue and keep going.
    Loop,
    /// Stop and report completion.
    #[default]
    StopAtEnd,
}

impl LoopMode {
    pub fn is_looping(&self) -> bool {
        matches!(self, LoopMode::Loop)
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopMode::Loop => write!(f, "Loop"),
            LoopMode::StopAtEnd => write!(f, "Stop at end"),
        }
    }
}

impl FromStr for LoopMode {
    type Err = WordSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "loop" | "true" | "yes" => Ok(LoopMode::Loop),
            "off" | "stop" | "stop-at-end" | "stop_at_end" | "false" | "no" => {
                Ok(LoopMode::StopAtEnd)
            }
            other => Err(WordSpeakerError::Validation(format!(
                "unknown loop mode '{}' (expected on or off)",
                other
            ))),
        }
    }
}

/// Playback status as observed by the interface layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "Stopped"),
            PlaybackStatus::Playing => write!(f, "Playing"),
            PlaybackStatus::Paused => write!(f, "Paused"),
        }
    }
}

/// How the user answers during dictation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictationStyle {
    /// Type each word and check it against the expected word.
    #[default]
    TypeAndCheck,
    /// Write on paper; playback only, no checking.
    PaperOnly,
}

impl fmt::Display for DictationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictationStyle::TypeAndCheck => write!(f, "Type & Check"),
            DictationStyle::PaperOnly => write!(f, "Paper Only"),
        }
    }
}

impl FromStr for DictationStyle {
    type Err = WordSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" | "type-and-check" | "type_and_check" | "check" => {
                Ok(DictationStyle::TypeAndCheck)
            }
            "paper" | "paper-only" | "paper_only" => Ok(DictationStyle::PaperOnly),
            other => Err(WordSpeakerError::Validation(format!(
                "unknown dictation style '{}' (expected type or paper)",
                other
            ))),
        }
    }
}

/// Host text-to-speech engine selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechEngineKind {
    /// `espeak-ng` or `espeak`.
    #[default]
    Espeak,
    /// macOS `say`.
    Say,
    /// No audio; utterances are logged only.
    Silent,
}

impl FromStr for SpeechEngineKind {
    type Err = WordSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "espeak" | "espeak-ng" => Ok(SpeechEngineKind::Espeak),
            "say" => Ok(SpeechEngineKind::Say),
            "silent" | "none" => Ok(SpeechEngineKind::Silent),
            other => Err(WordSpeakerError::Validation(format!(
                "unknown speech engine '{}'",
                other
            ))),
        }
    }
}

/// Supported word-list file formats, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordFileKind {
    /// One word or phrase per line.
    Text,
    /// First column of each row.
    Csv,
}

impl WordFileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(WordFileKind::Text),
            "csv" => Some(WordFileKind::Csv),
            _ => None,
        }
    }
}

/// Delay between automatic word advances.
///
/// Invariant: within [`PlaybackInterval::MIN_SECS`]..=[`PlaybackInterval::MAX_SECS`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct PlaybackInterval(f64);

impl PlaybackInterval {
    pub const MIN_SECS: f64 = 0.5;
    pub const DEFAULT_SECS: f64 = 2.0;
    pub const MAX_SECS: f64 = 3600.0;

    /// Clamp to the minimum. Non-finite values and values above
    /// [`PlaybackInterval::MAX_SECS`] fall back to the default.
    pub fn new(secs: f64) -> Self {
        if !secs.is_finite() || secs > Self::MAX_SECS {
            return Self::default();
        }
        Self(secs.max(Self::MIN_SECS))
    }

    /// Parse a user-entered value, falling back to the default when invalid.
    pub fn parse_or_default(input: &str) -> Self {
        match input.trim().trim_end_matches('s').parse::<f64>() {
            Ok(secs) => Self::new(secs),
            Err(_) => Self::default(),
        }
    }

    pub fn secs(&self) -> f64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.0)
            .unwrap_or_else(|_| Duration::from_secs_f64(Self::DEFAULT_SECS))
    }
}

impl Default for PlaybackInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

impl From<f64> for PlaybackInterval {
    fn from(secs: f64) -> Self {
        Self::new(secs)
    }
}

// =============================================================================
// Newtype Wrappers - Numeric
// =============================================================================

/// Speech volume. Range: 0.0 (silent) to 1.0 (full).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f32);

impl Volume {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Build from a 0-100 percentage as shown to the user.
    pub fn from_percent(percent: u32) -> Self {
        Self::new(percent as f32 / 100.0)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Generation token tagging timers and utterances of a playback state.
///
/// Compared by value. Anything carrying an older generation is stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Newtype Wrappers - String
// =============================================================================

/// Engine-provided voice identifier (e.g. "en-us" for eSpeak, "Samantha" for say).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(pub String);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Word list
// =============================================================================

/// The imported vocabulary, in file order.
///
/// Immutable once built; clones share the same backing slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordList(Arc<[String]>);

impl WordList {
    pub fn new(words: Vec<String>) -> Self {
        Self(words.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for WordList {
    fn from(words: Vec<String>) -> Self {
        Self::new(words)
    }
}

impl<'a> FromIterator<&'a str> for WordList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_mode_from_str() {
        assert_eq!("random".parse::<OrderMode>().unwrap(), OrderMode::Random);
        assert_eq!("In-Order".parse::<OrderMode>().unwrap(), OrderMode::InOrder);
        assert!("sideways".parse::<OrderMode>().is_err());
    }

    #[test]
    fn test_loop_mode_from_str() {
        assert_eq!("on".parse::<LoopMode>().unwrap(), LoopMode::Loop);
        assert_eq!("off".parse::<LoopMode>().unwrap(), LoopMode::StopAtEnd);
        assert!("maybe".parse::<LoopMode>().is_err());
        assert!(LoopMode::Loop.is_looping());
        assert!(!LoopMode::StopAtEnd.is_looping());
    }

    #[test]
    fn test_dictation_style_from_str() {
        assert_eq!(
            "paper".parse::<DictationStyle>().unwrap(),
            DictationStyle::PaperOnly
        );
        assert_eq!(
            "type".parse::<DictationStyle>().unwrap(),
            DictationStyle::TypeAndCheck
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&OrderMode::InOrder).unwrap(), "\"in_order\"");
        assert_eq!(serde_json::to_string(&LoopMode::StopAtEnd).unwrap(), "\"stop_at_end\"");
        assert_eq!(
            serde_json::to_string(&DictationStyle::PaperOnly).unwrap(),
            "\"paper_only\""
        );
    }

    #[test]
    fn test_word_file_kind_from_path() {
        assert_eq!(WordFileKind::from_path(Path::new("a/words.txt")), Some(WordFileKind::Text));
        assert_eq!(WordFileKind::from_path(Path::new("WORDS.CSV")), Some(WordFileKind::Csv));
        assert_eq!(WordFileKind::from_path(Path::new("words.json")), None);
        assert_eq!(WordFileKind::from_path(Path::new("words")), None);
    }

    #[test]
    fn test_interval_clamped_to_minimum() {
        assert_eq!(PlaybackInterval::new(0.1).secs(), PlaybackInterval::MIN_SECS);
        assert_eq!(PlaybackInterval::new(-3.0).secs(), PlaybackInterval::MIN_SECS);
        assert_eq!(PlaybackInterval::new(3.5).secs(), 3.5);
        assert_eq!(PlaybackInterval::new(f64::NAN).secs(), PlaybackInterval::DEFAULT_SECS);
    }

    #[test]
    fn test_interval_parse_falls_back_to_default() {
        assert_eq!(PlaybackInterval::parse_or_default("1.5").secs(), 1.5);
        assert_eq!(PlaybackInterval::parse_or_default("3s").secs(), 3.0);
        assert_eq!(PlaybackInterval::parse_or_default("abc").secs(), 2.0);
        assert_eq!(PlaybackInterval::parse_or_default("").secs(), 2.0);
        assert_eq!(PlaybackInterval::parse_or_default("0").secs(), 0.5);
    }

    #[test]
    fn test_interval_rejects_huge_values() {
        assert_eq!(PlaybackInterval::new(1e30), PlaybackInterval::default());
        assert_eq!(PlaybackInterval::new(3601.0), PlaybackInterval::default());
        assert_eq!(PlaybackInterval::new(PlaybackInterval::MAX_SECS).secs(), 3600.0);
        assert_eq!(PlaybackInterval::parse_or_default("1e30"), PlaybackInterval::default());
        assert_eq!(PlaybackInterval::new(1e30).as_duration(), Duration::from_secs(2));

        let decoded: PlaybackInterval = serde_json::from_str("1e30").unwrap();
        assert_eq!(decoded, PlaybackInterval::default());
    }

    #[test]
    fn test_interval_duration() {
        assert_eq!(
            PlaybackInterval::new(1.5).as_duration(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(Volume::new(1.7).value(), 1.0);
        assert_eq!(Volume::new(-0.2).value(), 0.0);
        assert_eq!(Volume::new(f32::NAN), Volume::default());
        assert_eq!(Volume::from_percent(80).percent(), 80);
        assert_eq!(Volume::from_percent(250).value(), 1.0);
    }

    #[test]
    fn test_generation_is_monotonic() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn test_word_list_shares_storage() {
        let list = WordList::new(vec!["apple".into(), "banana".into()]);
        let clone = list.clone();
        assert_eq!(clone.len(), 2);
        assert_eq!(clone.get(1), Some("banana"));
        assert_eq!(clone.get(2), None);
        assert_eq!(list, clone);
        assert!(WordList::default().is_empty());
    }

    #[test]
    fn test_word_list_from_iter() {
        let list: WordList = ["a", "b", "c"].into_iter().collect();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

}
