//! Popularity strategy: vote-count shrinkage toward the global mean.

use crate::error::Result;
use crate::primitives::Vector;
use crate::ratings::RatingMatrix;
use crate::recommend::{select_top_n, Recommendation, Recommender, DEFAULT_TOP_N};
use std::collections::HashSet;
use tracing::debug;

/// Popularity-adjusted scoring with a user-supplied minimum-vote threshold.
///
/// Every item gets the canonical weighted rating
///
/// ```text
/// score(i) = (v/(v+m))·avg(i) + (m/(v+m))·avg_global
/// ```
///
/// where `v` is the item's vote count and `m` the threshold, shrinking
/// low-vote items toward the global mean of the items that pass the filter.
/// Only items with at least `m` votes and unrated by the target user are
/// admitted into the final list.
///
/// # Examples
///
/// ```
/// use sugerir::prelude::*;
///
/// let mut store = RatingMatrix::new();
/// store.register("alice", "dune");
/// store.register("alice", "solaris");
/// store.set_rating("alice", "dune", 5.0);
/// store.set_rating("alice", "solaris", 3.0);
/// store.register("bob", "dune");
/// store.set_rating("bob", "dune", 4.0);
///
/// let rec = Popularity::new(1).recommend(&store, "bob").expect("candidates exist");
/// assert_eq!(rec.items, vec!["solaris"]);
/// ```
#[derive(Debug, Clone)]
pub struct Popularity {
    min_votes: usize,
    top_n: usize,
}

impl Popularity {
    /// Create the strategy with the given minimum-vote threshold.
    #[must_use]
    pub fn new(min_votes: usize) -> Self {
        Self {
            min_votes,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Override the recommendation list size.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// The weighted-rating blend for one item.
    fn weighted_rating(&self, votes: usize, avg_item: f32, avg_global: f32) -> f32 {
        let denom = (votes + self.min_votes) as f32;
        if denom == 0.0 {
            // threshold 0 and no votes: nothing to blend
            return avg_global;
        }
        let v = votes as f32;
        let m = self.min_votes as f32;
        (v / denom) * avg_item + (m / denom) * avg_global
    }
}

impl Recommender for Popularity {
    fn recommend(&self, store: &RatingMatrix, user_id: &str) -> Result<Recommendation> {
        let considered = store.items_with_min_votes(self.min_votes);
        let avg_global = store.global_average(&considered)?;
        debug!(
            user = user_id,
            min_votes = self.min_votes,
            candidates = considered.len(),
            avg_global,
            "popularity scoring"
        );
        let considered: HashSet<&str> = considered.iter().map(String::as_str).collect();

        let scores = Vector::from_vec(
            store
                .item_ids()
                .iter()
                .map(|id| {
                    self.weighted_rating(
                        store.vote_count(id),
                        store.average_for_item(id),
                        avg_global,
                    )
                })
                .collect(),
        );

        let items = select_top_n(&scores, store.item_ids(), self.top_n, |id| {
            considered.contains(id) && store.is_unrated(user_id, id)
        });
        Ok(Recommendation { scores, items })
    }
}
