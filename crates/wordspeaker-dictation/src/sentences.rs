//! Template-based example sentences.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wordspeaker_core::error::WordSpeakerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SentenceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SentenceLevel {
    pub const ALL: [SentenceLevel; 3] = [
        SentenceLevel::Beginner,
        SentenceLevel::Intermediate,
        SentenceLevel::Advanced,
    ];

    fn templates(self) -> &'static [&'static str] {
        match self {
            SentenceLevel::Beginner => &[
                "I like {word}.",
                "This is a {word}.",
                "My {word} is red.",
                "The {word} is big.",
                "I have a {word}.",
            ],
            SentenceLevel::Intermediate => &[
                "I need to buy some {word} for dinner.",
                "The {word} book is very interesting.",
                "She works as a {word} in the company.",
                "We should discuss this {word} tomorrow.",
                "This {word} method is quite effective.",
            ],
            SentenceLevel::Advanced => &[
                "The implementation of this {word} algorithm requires careful consideration.",
                "Despite the {word} challenges, the project was completed successfully.",
                "The researcher's {word} analysis provided valuable insights.",
                "Companies are increasingly adopting {word} strategies to improve efficiency.",
                "The {word} phenomenon has significant implications for future development.",
            ],
        }
    }
}

impl fmt::Display for SentenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceLevel::Beginner => write!(f, "beginner"),
            SentenceLevel::Intermediate => write!(f, "intermediate"),
            SentenceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for SentenceLevel {
    type Err = WordSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(SentenceLevel::Beginner),
            "intermediate" | "medium" => Ok(SentenceLevel::Intermediate),
            "advanced" | "hard" => Ok(SentenceLevel::Advanced),
            other => Err(WordSpeakerError::Validation(format!(
                "unknown sentence level '{}' (expected beginner, intermediate or advanced)",
                other
            ))),
        }
    }
}

/// Irregular words that get their own templates regardless of level.
fn special_templates(word: &str) -> Option<&'static [&'static str]> {
    match word.to_lowercase().as_str() {
        "be" => Some(&["I {word} happy.", "She {word} a teacher.", "They {word} students."]),
        "have" => Some(&["I {word} a car.", "We {word} two cats.", "She {word} experience."]),
        _ => None,
    }
}

fn fill(template: &str, word: &str) -> String {
    template.replace("{word}", word)
}

pub struct SentenceGenerator {
    rng: StdRng,
}

impl Default for SentenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<'a>(&mut self, templates: &[&'a str]) -> &'a str {
        templates[self.rng.random_range(0..templates.len())]
    }

    /// One sentence containing `word`.
    pub fn generate(&mut self, word: &str, level: SentenceLevel) -> String {
        let templates = special_templates(word).unwrap_or_else(|| level.templates());
        let template = self.pick(templates);
        fill(template, word)
    }

    /// `count` sentences, cycling through `levels` in order. Templates are not
    /// reused until the current level has none left. An empty `levels` uses
    /// beginner only.
    pub fn generate_many(
        &mut self,
        word: &str,
        count: usize,
        levels: &[SentenceLevel],
    ) -> Vec<String> {
        let levels = if levels.is_empty() {
            &[SentenceLevel::Beginner][..]
        } else {
            levels
        };
        let mut used: HashSet<&'static str> = HashSet::new();
        let mut sentences = Vec::with_capacity(count);

        for i in 0..count {
            let all = levels[i % levels.len()].templates();
            let mut available: Vec<&'static str> =
                all.iter().copied().filter(|t| !used.contains(t)).collect();
            if available.is_empty() {
                used.clear();
                available = all.to_vec();
            }
            let template = self.pick(&available);
            used.insert(template);
            sentences.push(fill(template, word));
        }
        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_contains_word() {
        let mut gen = SentenceGenerator::with_seed(7);
        for level in SentenceLevel::ALL {
            let sentence = gen.generate("apple", level);
            assert!(sentence.contains("apple"), "{sentence}");
            assert!(level.templates().iter().any(|t| fill(t, "apple") == sentence));
        }
    }

    #[test]
    fn test_special_words_substitute() {
        let mut gen = SentenceGenerator::with_seed(1);
        for _ in 0..10 {
            let sentence = gen.generate("Have", SentenceLevel::Advanced);
            assert!(sentence.contains("Have"), "{sentence}");
            assert!(!sentence.contains('{'));
            let sentence = gen.generate("be", SentenceLevel::Beginner);
            assert!(sentence.contains(" be "), "{sentence}");
        }
    }

    #[test]
    fn test_generate_many_rotates_levels() {
        let mut gen = SentenceGenerator::with_seed(3);
        let sentences = gen.generate_many("river", 3, &SentenceLevel::ALL);
        assert_eq!(sentences.len(), 3);
        for (sentence, level) in sentences.iter().zip(SentenceLevel::ALL) {
            assert!(level.templates().iter().any(|t| &fill(t, "river") == sentence));
        }
    }

    #[test]
    fn test_generate_many_no_reuse_until_exhausted() {
        let mut gen = SentenceGenerator::with_seed(11);
        let sentences = gen.generate_many("cloud", 5, &[SentenceLevel::Beginner]);
        let unique: HashSet<&String> = sentences.iter().collect();
        assert_eq!(unique.len(), 5);

        let sentences = gen.generate_many("cloud", 7, &[SentenceLevel::Beginner]);
        assert_eq!(sentences.len(), 7);
        let first_five: HashSet<&String> = sentences[..5].iter().collect();
        assert_eq!(first_five.len(), 5);
    }

    #[test]
    fn test_generate_many_empty_levels() {
        let mut gen = SentenceGenerator::with_seed(0);
        let sentences = gen.generate_many("tree", 2, &[]);
        assert!(sentences
            .iter()
            .all(|s| SentenceLevel::Beginner.templates().iter().any(|t| &fill(t, "tree") == s)));
    }

    #[test]
    fn test_level_parse_and_display() {
        assert_eq!("Hard".parse::<SentenceLevel>().unwrap(), SentenceLevel::Advanced);
        assert_eq!(SentenceLevel::Intermediate.to_string(), "intermediate");
        assert!("expert".parse::<SentenceLevel>().is_err());
    }
}
