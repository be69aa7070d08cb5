//! TF-IDF vectorization of item feature text.
//!
//! Converts a collection of short free-text documents (one per item) into a
//! TF-IDF weighted term matrix:
//!
//! ```text
//! tfidf(t, d) = tf(t, d) × idf(t)
//! idf(t) = ln((1 + N) / (1 + df(t))) + 1
//! ```
//!
//! with smoothed document frequencies and L2-normalized rows, matching the
//! conventional defaults for this transform. Tokens are lowercased, split on
//! non-alphanumeric characters, and dropped when shorter than two characters
//! or present in the stop-word list.

use crate::error::{Result, SugerirError};
use crate::primitives::Matrix;
use crate::text::StopWordsFilter;
use std::collections::HashMap;

/// TF-IDF vectorizer over short item feature texts.
///
/// # Examples
///
/// ```
/// use sugerir::text::TfidfVectorizer;
///
/// let docs = vec!["Action|Adventure", "Action|Thriller"];
/// let mut vectorizer = TfidfVectorizer::new().with_stop_words_english();
/// let matrix = vectorizer.fit_transform(&docs).expect("non-empty corpus");
///
/// assert_eq!(matrix.n_rows(), 2);
/// assert_eq!(vectorizer.vocabulary_size(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    stop_words: Option<StopWordsFilter>,
}

impl TfidfVectorizer {
    /// Create a vectorizer with no stop-word filtering.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            stop_words: None,
        }
    }

    /// Filter English stop words before counting terms.
    #[must_use]
    pub fn with_stop_words_english(mut self) -> Self {
        self.stop_words = Some(StopWordsFilter::english());
        self
    }

    /// Learn vocabulary and document frequencies, then transform.
    ///
    /// # Errors
    ///
    /// Returns an error when `documents` is empty.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Matrix<f32>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Learn the vocabulary and inverse document frequencies.
    ///
    /// Vocabulary columns are ordered by corpus frequency (descending), ties
    /// broken alphabetically, so the layout is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error when `documents` is empty.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(SugerirError::empty_candidates("TF-IDF corpus"));
        }

        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = self.tokenize(doc.as_ref());
            let mut doc_terms: std::collections::HashSet<&str> = std::collections::HashSet::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
            }
            for token in &tokens {
                doc_terms.insert(token);
            }
            for term in doc_terms {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        let mut sorted_terms: Vec<(String, usize)> = term_freq.into_iter().collect();
        sorted_terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        self.vocabulary = sorted_terms
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();

        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            self.idf[idx] = (((1 + n_docs) as f32) / ((1 + df) as f32)).ln() + 1.0;
        }
        Ok(())
    }

    /// Transform documents into the TF-IDF matrix using the fitted
    /// vocabulary. Rows are L2-normalized; a document with no known terms
    /// stays a zero row.
    ///
    /// # Errors
    ///
    /// Returns an error when `documents` is empty.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Matrix<f32>> {
        if documents.is_empty() {
            return Err(SugerirError::empty_candidates("TF-IDF corpus"));
        }

        let vocab_size = self.vocabulary.len();
        let mut matrix = Matrix::zeros(documents.len(), vocab_size);

        for (doc_idx, doc) in documents.iter().enumerate() {
            for token in self.tokenize(doc.as_ref()) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    matrix.set(doc_idx, col, matrix.get(doc_idx, col) + 1.0);
                }
            }
            let mut norm_sq = 0.0_f32;
            for col in 0..vocab_size {
                let weighted = matrix.get(doc_idx, col) * self.idf[col];
                matrix.set(doc_idx, col, weighted);
                norm_sq += weighted * weighted;
            }
            if norm_sq > 0.0 {
                let norm = norm_sq.sqrt();
                for col in 0..vocab_size {
                    matrix.set(doc_idx, col, matrix.get(doc_idx, col) / norm);
                }
            }
        }
        Ok(matrix)
    }

    /// Number of terms in the fitted vocabulary.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// The fitted term → column mapping.
    #[must_use]
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Lowercase, split on non-alphanumeric characters, drop one-character
    /// tokens and stop words.
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 2)
            .filter(|t| {
                self.stop_words
                    .as_ref()
                    .map_or(true, |sw| !sw.is_stop_word(t))
            })
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_shape() {
        let docs = vec!["action adventure", "action thriller"];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).expect("fit_transform");
        assert_eq!(m.shape(), (2, 3));
    }

    #[test]
    fn test_vocabulary_order_is_deterministic() {
        let docs = vec!["action adventure", "action thriller"];
        let mut v = TfidfVectorizer::new();
        v.fit(&docs).expect("fit");
        // "action" appears twice, then alphabetical ties
        assert_eq!(v.vocabulary()["action"], 0);
        assert_eq!(v.vocabulary()["adventure"], 1);
        assert_eq!(v.vocabulary()["thriller"], 2);
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let docs = vec!["action adventure", "action thriller"];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).expect("fit_transform");
        for row in 0..m.n_rows() {
            let norm = m.row(row).norm();
            assert!((norm - 1.0).abs() < 1e-5, "row {row} norm = {norm}");
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let docs = vec!["action adventure", "action thriller"];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).expect("fit_transform");
        // within doc 0, the rare "adventure" outweighs the common "action"
        assert!(m.get(0, 1) > m.get(0, 0));
        // doc 0 has no "thriller"
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_pipe_delimited_genres_tokenize() {
        let docs = vec!["Action|Sci-Fi", "Comedy"];
        let mut v = TfidfVectorizer::new();
        v.fit(&docs).expect("fit");
        assert!(v.vocabulary().contains_key("action"));
        assert!(v.vocabulary().contains_key("sci"));
        assert!(v.vocabulary().contains_key("fi"));
        assert!(v.vocabulary().contains_key("comedy"));
    }

    #[test]
    fn test_stop_words_removed() {
        let docs = vec!["the lord of the rings", "the hobbit"];
        let mut v = TfidfVectorizer::new().with_stop_words_english();
        v.fit(&docs).expect("fit");
        assert!(!v.vocabulary().contains_key("the"));
        assert!(!v.vocabulary().contains_key("of"));
        assert!(v.vocabulary().contains_key("lord"));
        assert!(v.vocabulary().contains_key("hobbit"));
    }

    #[test]
    fn test_empty_corpus_errors() {
        let mut v = TfidfVectorizer::new();
        let docs: Vec<&str> = vec![];
        assert!(v.fit_transform(&docs).is_err());
    }

    #[test]
    fn test_blank_documents_become_zero_rows() {
        let docs = vec!["action", ""];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).expect("fit_transform");
        assert_eq!(m.row(1).count_nonzero(), 0);
    }

    #[test]
    fn test_all_blank_corpus_gives_empty_vocabulary() {
        let docs = vec!["", "  "];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).expect("fit_transform");
        assert_eq!(m.shape(), (2, 0));
    }
}
