//! Bigram feature extraction.
//!
//! Words are split into overlapping two-unit slices. Lengths and slice
//! boundaries are measured in UTF-16 code units, so a slice may cut a
//! surrogate pair in half; such halves decode to U+FFFD. Grapheme clusters
//! are not respected.
//!
//! Two strategies exist because the in-memory matcher and the on-disk index
//! disagree on case folding. Call sites pick one explicitly.

use std::borrow::Borrow;
use std::fmt;

/// A bigram used as an inverted-index key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature(String);

impl Feature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes used by the persistent index.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Feature {
    fn from(s: &str) -> Self {
        Feature(s.to_owned())
    }
}

impl From<String> for Feature {
    fn from(s: String) -> Self {
        Feature(s)
    }
}

impl Borrow<str> for Feature {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BigramStrategy {
    /// Lowercased bigrams, used by the in-memory matcher.
    CaseFolded,
    /// Bigrams as written, used by the persistent index.
    Raw,
}

impl BigramStrategy {
    pub fn bigrams(self, word: &str) -> Vec<Feature> {
        let units: Vec<u16> = word.encode_utf16().collect();
        if units.len() < 2 {
            return Vec::new();
        }

        units
            .windows(2)
            .map(|pair| {
                let gram = String::from_utf16_lossy(pair);
                match self {
                    BigramStrategy::CaseFolded => Feature(gram.to_lowercase()),
                    BigramStrategy::Raw => Feature(gram),
                }
            })
            .collect()
    }
}

/// Case-folded bigrams of `word`, duplicates kept, in order of appearance.
pub fn extract_features(word: &str) -> Vec<Feature> {
    BigramStrategy::CaseFolded.bigrams(word)
}

/// Bigrams of `word` without case folding.
pub fn raw_bigrams(word: &str) -> Vec<Feature> {
    BigramStrategy::Raw.bigrams(word)
}

/// Length of `word` in UTF-16 code units.
pub(crate) fn utf16_len(word: &str) -> usize {
    word.encode_utf16().count()
}
