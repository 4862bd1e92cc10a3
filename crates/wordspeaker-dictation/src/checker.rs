//! Answer checking.

use similar::{DiffOp, DiffTag};
use tracing::debug;

use wordspeaker_core::types::DictationStyle;

use crate::diff::align;
use crate::error::DictationError;

/// How a span of text is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanTag {
    Equal,
    /// Present on both sides but different.
    Wrong,
    /// In the expected word only.
    Missing,
    /// In the user's input only.
    Extra,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tag: SpanTag,
    pub text: String,
}

/// Result of comparing the user's input against the expected word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub expected: String,
    pub actual: String,
    /// Character-indexed opcodes.
    pub ops: Vec<DiffOp>,
    /// `expected` split into equal, wrong and missing spans.
    pub expected_spans: Vec<Span>,
    /// `actual` split into equal, wrong and extra spans.
    pub actual_spans: Vec<Span>,
}

impl DiffResult {
    /// True when input matches the expected word, ignoring case.
    pub fn is_correct(&self) -> bool {
        self.ops.iter().all(|op| op.tag() == DiffTag::Equal)
    }

    /// Matched characters as a fraction of the expected length.
    pub fn accuracy(&self) -> f64 {
        let total = self.expected.chars().count();
        if total == 0 {
            return if self.actual.is_empty() { 1.0 } else { 0.0 };
        }
        let matched: usize = self
            .ops
            .iter()
            .filter(|op| op.tag() == DiffTag::Equal)
            .map(|op| op.old_range().len())
            .sum();
        matched as f64 / total as f64
    }

    /// Number of expected characters the user left out.
    pub fn missing_count(&self) -> usize {
        count_chars(&self.expected_spans, SpanTag::Missing)
    }

    /// Number of typed characters not in the expected word.
    pub fn extra_count(&self) -> usize {
        count_chars(&self.actual_spans, SpanTag::Extra)
    }

    /// Number of expected characters typed wrongly.
    pub fn wrong_count(&self) -> usize {
        count_chars(&self.expected_spans, SpanTag::Wrong)
    }
}

fn count_chars(spans: &[Span], tag: SpanTag) -> usize {
    spans
        .iter()
        .filter(|s| s.tag == tag)
        .map(|s| s.text.chars().count())
        .sum()
}

/// Compare `actual` against `expected`. Pure; case is ignored for matching
/// and kept in the spans.
pub fn check(expected: &str, actual: &str) -> DiffResult {
    let old: Vec<char> = expected.chars().collect();
    let new: Vec<char> = actual.chars().collect();
    let ops = align(&old, &new);

    let mut expected_spans = Vec::new();
    let mut actual_spans = Vec::new();
    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let (expected_tag, actual_tag) = match tag {
            DiffTag::Equal => (Some(SpanTag::Equal), Some(SpanTag::Equal)),
            DiffTag::Replace => (Some(SpanTag::Wrong), Some(SpanTag::Wrong)),
            DiffTag::Delete => (Some(SpanTag::Missing), None),
            DiffTag::Insert => (None, Some(SpanTag::Extra)),
        };
        if let Some(tag) = expected_tag {
            expected_spans.push(Span {
                tag,
                text: old[old_range].iter().collect(),
            });
        }
        if let Some(tag) = actual_tag {
            actual_spans.push(Span {
                tag,
                text: new[new_range].iter().collect(),
            });
        }
    }

    DiffResult {
        expected: expected.to_string(),
        actual: actual.to_string(),
        ops,
        expected_spans,
        actual_spans,
    }
}

/// Applies the dictation style to checking.
#[derive(Debug, Clone, Default)]
pub struct DictationChecker {
    style: DictationStyle,
}

impl DictationChecker {
    pub fn new(style: DictationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> DictationStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DictationStyle) {
        debug!(%style, "Dictation style changed");
        self.style = style;
    }

    /// Check `input` against the current word.
    ///
    /// The input is trimmed of surrounding whitespace before comparison.
    pub fn check(&self, current: Option<&str>, input: &str) -> Result<DiffResult, DictationError> {
        if self.style == DictationStyle::PaperOnly {
            return Err(DictationError::PaperMode);
        }
        let expected = current.ok_or(DictationError::NoCurrentWord)?;
        let result = check(expected, input.trim());
        debug!(
            expected,
            correct = result.is_correct(),
            accuracy = result.accuracy(),
            "Answer checked"
        );
        Ok(result)
    }
}
