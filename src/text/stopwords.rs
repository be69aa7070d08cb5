//! Stop words filtering for text preprocessing.
//!
//! Stop words are common words (like "the", "is", "at") that carry little
//! semantic meaning and are removed before vectorization so genre and title
//! text doesn't match on filler words.

use std::collections::HashSet;

/// Stop words filter with case-insensitive O(1) membership checks.
///
/// # Examples
///
/// ```
/// use sugerir::text::StopWordsFilter;
///
/// let filter = StopWordsFilter::english();
/// assert!(filter.is_stop_word("The"));
/// assert!(!filter.is_stop_word("thriller"));
/// ```
#[derive(Debug, Clone)]
pub struct StopWordsFilter {
    stop_words: HashSet<String>,
}

impl StopWordsFilter {
    /// Create a filter from custom stop words (lowercased on insert).
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        Self { stop_words }
    }

    /// Create a filter with common English stop words.
    #[must_use]
    pub fn english() -> Self {
        Self::new(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// True if the word is a stop word (case-insensitive).
    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Number of stop words in the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// True if the filter has no stop words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

/// Common English stop words, after NLTK/scikit-learn.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "may", "me", "might", "more", "most", "must", "my", "myself", "no", "none", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "upon", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "you", "your", "yours", "yourself", "yourselves",
];
