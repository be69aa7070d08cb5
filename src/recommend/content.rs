//! Content-based filtering over TF-IDF item features.

use crate::error::Result;
use crate::primitives::Vector;
use crate::ratings::RatingMatrix;
use crate::recommend::{select_top_n, Recommendation, Recommender, DEFAULT_TOP_N};
use crate::text::TfidfVectorizer;
use tracing::debug;

/// Content-based strategy: match items against a rating-weighted profile.
///
/// Each item's feature text becomes a TF-IDF row. The user profile is the sum
/// of those rows weighted by the user's ratings, divided by the sum of the
/// ratings; a user with no ratings gets the zero profile (and all-zero
/// scores), never a division fault. Item scores are the dot product with the
/// profile, rescaled by [`RatingMatrix::max_rating`] so they live on the same
/// numeric scale as raw ratings.
#[derive(Debug, Clone)]
pub struct ContentBased {
    top_n: usize,
}

impl Default for ContentBased {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentBased {
    /// Create the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }

    /// Override the recommendation list size.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

impl Recommender for ContentBased {
    fn recommend(&self, store: &RatingMatrix, user_id: &str) -> Result<Recommendation> {
        if store.n_items() == 0 {
            return Ok(Recommendation {
                scores: Vector::zeros(0),
                items: Vec::new(),
            });
        }

        let features = store.item_text_features(store.item_ids());
        let mut vectorizer = TfidfVectorizer::new().with_stop_words_english();
        let tfidf = vectorizer.fit_transform(&features)?;
        debug!(
            user = user_id,
            items = tfidf.n_rows(),
            terms = tfidf.n_cols(),
            "content profile"
        );

        let ratings = store.ratings_vector(user_id);
        let vocab = tfidf.n_cols();
        let mut profile = vec![0.0_f32; vocab];
        for (item, &rating) in ratings.iter().enumerate() {
            if rating != 0.0 {
                for term in 0..vocab {
                    profile[term] += tfidf.get(item, term) * rating;
                }
            }
        }
        let normalizer = ratings.sum();
        if normalizer != 0.0 {
            for weight in &mut profile {
                *weight /= normalizer;
            }
        }
        let profile = Vector::from_vec(profile);

        let max_rating = store.max_rating();
        let scores = Vector::from_vec(
            (0..store.n_items())
                .map(|item| tfidf.row(item).dot(&profile) * max_rating)
                .collect(),
        );

        let items = select_top_n(&scores, store.item_ids(), self.top_n, |id| {
            store.is_unrated(user_id, id)
        });
        Ok(Recommendation { scores, items })
    }
}
