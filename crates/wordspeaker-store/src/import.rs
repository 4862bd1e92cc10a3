//! Word list file parsing.
//!
//! Entries are trimmed and blank entries skipped. A UTF-8 byte-order mark at
//! the start of the file is ignored.

use std::path::Path;

use tracing::debug;

use wordspeaker_core::types::{WordFileKind, WordList};

use crate::error::StoreError;

/// Read and parse a word list, choosing the format by extension.
pub fn read_word_file(path: &Path) -> Result<WordList, StoreError> {
    let kind = WordFileKind::from_path(path).ok_or_else(|| StoreError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let words = match kind {
        WordFileKind::Text => parse_text(content),
        WordFileKind::Csv => parse_csv(content),
    };
    debug!(path = %path.display(), ?kind, count = words.len(), "Parsed word file");
    Ok(WordList::new(words))
}

/// One entry per line.
pub fn parse_text(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// First column of each record.
///
/// Quoted fields may contain commas, newlines and doubled quotes (`""`).
pub fn parse_csv(content: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut field = String::new();
    let mut column = 0usize;
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    if column == 0 {
                        field.push('"');
                    }
                }
                '"' => in_quotes = false,
                _ if column == 0 => field.push(c),
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => column += 1,
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_record(&mut words, &mut field);
                column = 0;
            }
            _ if column == 0 => field.push(c),
            _ => {}
        }
    }
    finish_record(&mut words, &mut field);
    words
}

fn finish_record(words: &mut Vec<String>, field: &mut String) {
    let word = field.trim();
    if !word.is_empty() {
        words.push(word.to_string());
    }
    field.clear();
}
