//! Recommendation strategies over a rating matrix.
//!
//! Three interchangeable strategies implement [`Recommender`]:
//!
//! - [`Popularity`]: Bayesian-shrinkage weighted rating with a minimum-vote
//!   candidate filter.
//! - [`Collaborative`]: user-based k-nearest-neighbor filtering over the
//!   common-dimension cosine similarity.
//! - [`ContentBased`]: TF-IDF item vectors matched against a rating-weighted
//!   user profile.
//!
//! Each strategy is stateless across calls: `recommend` is a pure function of
//! the immutable store, the user id, and the strategy parameters. All three
//! share the same greedy top-N selection policy.

mod collaborative;
mod content;
mod popularity;

pub use collaborative::Collaborative;
pub use content::ContentBased;
pub use popularity::Popularity;

use crate::error::Result;
use crate::primitives::Vector;
use crate::ratings::RatingMatrix;

/// Number of items a recommendation aims for.
pub const DEFAULT_TOP_N: usize = 5;

/// A scored ranking: the full score vector plus the selected top items.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// One score per known item, aligned to the store's item column order.
    pub scores: Vector<f32>,
    /// Selected item ids, best first. Shorter than the requested size only
    /// when fewer eligible unrated candidates exist.
    pub items: Vec<String>,
}

/// A ranking strategy over the immutable rating store.
pub trait Recommender {
    /// Produce a ranked top-N recommendation for the user.
    ///
    /// # Errors
    ///
    /// Strategy-specific; e.g. [`Popularity`] fails when no item passes the
    /// minimum-vote filter.
    fn recommend(&self, store: &RatingMatrix, user_id: &str) -> Result<Recommendation>;
}

/// Greedy top-N selection shared by all strategies.
///
/// Repeatedly takes the current maximum-scoring candidate, admits it only if
/// `eligible` says so, and removes it from further consideration either way,
/// until `n` items are collected or the candidates run out. Ties go to the
/// earliest remaining position, which makes the ranking deterministic.
pub(crate) fn select_top_n(
    scores: &Vector<f32>,
    item_ids: &[String],
    n: usize,
    mut eligible: impl FnMut(&str) -> bool,
) -> Vec<String> {
    debug_assert_eq!(scores.len(), item_ids.len());
    let mut remaining: Vec<usize> = (0..item_ids.len()).collect();
    let mut picked = Vec::new();
    while picked.len() < n && !remaining.is_empty() {
        let mut best = 0;
        for pos in 1..remaining.len() {
            if scores[remaining[pos]] > scores[remaining[best]] {
                best = pos;
            }
        }
        let idx = remaining.remove(best);
        let id = &item_ids[idx];
        if eligible(id) {
            picked.push(id.clone());
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_select_descending_by_score() {
        let scores = Vector::from_slice(&[1.0, 3.0, 2.0]);
        let items = ids(&["a", "b", "c"]);
        let picked = select_top_n(&scores, &items, 3, |_| true);
        assert_eq!(picked, ids(&["b", "c", "a"]));
    }

    #[test]
    fn test_ties_go_to_earliest_position() {
        let scores = Vector::from_slice(&[2.0, 2.0, 2.0]);
        let items = ids(&["a", "b", "c"]);
        let picked = select_top_n(&scores, &items, 2, |_| true);
        assert_eq!(picked, ids(&["a", "b"]));
    }

    #[test]
    fn test_ineligible_items_consume_candidates_not_slots() {
        let scores = Vector::from_slice(&[5.0, 4.0, 3.0, 2.0]);
        let items = ids(&["a", "b", "c", "d"]);
        let picked = select_top_n(&scores, &items, 2, |id| id != "a");
        assert_eq!(picked, ids(&["b", "c"]));
    }

    #[test]
    fn test_exhaustion_returns_fewer_than_n() {
        let scores = Vector::from_slice(&[1.0, 2.0]);
        let items = ids(&["a", "b"]);
        let picked = select_top_n(&scores, &items, 5, |id| id == "b");
        assert_eq!(picked, ids(&["b"]));
    }

    #[test]
    fn test_empty_candidates() {
        let scores = Vector::zeros(0);
        let items: Vec<String> = vec![];
        assert!(select_top_n(&scores, &items, 5, |_| true).is_empty());
    }
}
