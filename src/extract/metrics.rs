use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Text statistics attached to every document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub characters: usize,
    pub words: usize,
    pub sentences: usize,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    /// Distinct words (case-insensitive) over total words
    pub lexical_density: f64,
}

impl Metrics {
    /// Computes metrics for cleaned text
    ///
    /// Words are whitespace-separated tokens with surrounding punctuation
    /// removed. Sentences are runs of text ending in `.`, `!` or `?` that
    /// contain at least one letter or digit. Ratios are rounded to 4 places.
    pub fn compute(text: &str) -> Self {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .collect();

        let sentences = text
            .split(['.', '!', '?'])
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .count();

        let word_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let distinct: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();

        Self {
            characters: text.chars().count(),
            words: words.len(),
            sentences,
            avg_word_length: round4(ratio(word_chars, words.len())),
            avg_sentence_length: round4(ratio(words.len(), sentences)),
            lexical_density: round4(ratio(distinct.len(), words.len())),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_sample() {
        let metrics = Metrics::compute("Ala ma kota. Kot ma Alę!");
        assert_eq!(metrics.characters, 24);
        assert_eq!(metrics.words, 6);
        assert_eq!(metrics.sentences, 2);
        assert_eq!(metrics.avg_word_length, 2.8333);
        assert_eq!(metrics.avg_sentence_length, 3.0);
        assert_eq!(metrics.lexical_density, 0.8333);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(Metrics::compute(""), Metrics::default());
    }

    #[test]
    fn test_unterminated_sentence_counts() {
        let metrics = Metrics::compute("Pierwsze zdanie. Drugie bez kropki");
        assert_eq!(metrics.sentences, 2);
        assert_eq!(metrics.words, 5);
    }

    #[test]
    fn test_punctuation_only_tokens_are_not_words() {
        let metrics = Metrics::compute("Tak - nie ... ?");
        assert_eq!(metrics.words, 2);
        assert_eq!(metrics.sentences, 1);
    }
}
