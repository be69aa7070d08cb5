//! Text processing for content-based scoring.
//!
//! Item feature fields (genre lists, author names) are free text. This module
//! turns them into TF-IDF weighted term vectors with standard English
//! stop-word removal, which the content-based strategy matches against a
//! user's rating-weighted profile.

pub mod stopwords;
pub mod tfidf;

pub use stopwords::StopWordsFilter;
pub use tfidf::TfidfVectorizer;
