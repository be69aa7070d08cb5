//! User-based collaborative filtering.

use crate::error::Result;
use crate::primitives::Vector;
use crate::ratings::RatingMatrix;
use crate::recommend::{select_top_n, Recommendation, Recommender, DEFAULT_TOP_N};
use rayon::prelude::*;
use tracing::debug;

/// k-nearest-neighbor collaborative filtering.
///
/// Similarity to every other user is computed fresh on each call (cosine over
/// commonly-rated dimensions), the top `k` neighbors are kept, and each item
/// is predicted as the target's mean rating plus the similarity-weighted mean
/// deviation of the neighbors:
///
/// ```text
/// score(i) = avg(target) + Σ_k sim(k)·(r(k,i) − avg(k)) / Σ_k sim(k)
/// ```
///
/// The target user is excluded from the neighbor ranking outright, so a
/// spurious self-similarity can never occupy a neighbor slot. A zero
/// similarity-weight sum contributes 0, not an error.
///
/// The per-candidate similarity scan is the dominant cost and each candidate
/// is independent, so it runs on the rayon thread pool.
#[derive(Debug, Clone)]
pub struct Collaborative {
    k: usize,
    top_n: usize,
}

impl Default for Collaborative {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Collaborative {
    /// Create the strategy with the given neighborhood size.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Override the recommendation list size.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// The `k` most similar users, self excluded, best first. Stable on
    /// ties: equal similarities keep row order.
    fn neighbors(&self, store: &RatingMatrix, user_id: &str) -> Vec<(String, f32)> {
        let mut similarities: Vec<(String, f32)> = store
            .user_ids()
            .par_iter()
            .filter(|other| other.as_str() != user_id)
            .map(|other| (other.clone(), store.similarity(user_id, other)))
            .collect();
        similarities.sort_by(|a, b| b.1.total_cmp(&a.1));
        similarities.truncate(self.k);
        similarities
    }
}

impl Recommender for Collaborative {
    fn recommend(&self, store: &RatingMatrix, user_id: &str) -> Result<Recommendation> {
        let neighbors = self.neighbors(store, user_id);
        debug!(user = user_id, k = neighbors.len(), "collaborative neighbors");

        let target_mean = store.average_for_user(user_id);
        let weight_sum: f32 = neighbors.iter().map(|(_, sim)| sim).sum();
        let neighbor_rows: Vec<(Vector<f32>, f32, f32)> = neighbors
            .iter()
            .map(|(id, sim)| (store.ratings_vector(id), store.average_for_user(id), *sim))
            .collect();

        let scores = Vector::from_vec(
            (0..store.n_items())
                .map(|col| {
                    if weight_sum == 0.0 {
                        return target_mean;
                    }
                    let deviation: f32 = neighbor_rows
                        .iter()
                        .map(|(row, mean, sim)| sim * (row[col] - mean))
                        .sum();
                    target_mean + deviation / weight_sum
                })
                .collect(),
        );

        let items = select_top_n(&scores, store.item_ids(), self.top_n, |id| {
            store.is_unrated(user_id, id)
        });
        Ok(Recommendation { scores, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 users × 4 items: [[5,0,3,0],[4,0,0,2],[0,5,4,0]].
    fn sample_store() -> RatingMatrix {
        let mut store = RatingMatrix::new();
        for user in ["a", "b", "c"] {
            for item in ["i0", "i1", "i2", "i3"] {
                store.register(user, item);
            }
        }
        store.set_rating("a", "i0", 5.0);
        store.set_rating("a", "i2", 3.0);
        store.set_rating("b", "i0", 4.0);
        store.set_rating("b", "i3", 2.0);
        store.set_rating("c", "i1", 5.0);
        store.set_rating("c", "i2", 4.0);
        store
    }

    #[test]
    fn test_self_never_in_neighbor_set() {
        let store = sample_store();
        let cf = Collaborative::new(5);
        let neighbors = cf.neighbors(&store, "a");
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.iter().all(|(id, _)| id != "a"));
    }

    #[test]
    fn test_predicted_scores() {
        let store = sample_store();
        let rec = Collaborative::new(5).recommend(&store, "a").expect("recommend");
        // sim(a,b) = sim(a,c) = 1 (single shared dimension each);
        // mean(a)=4, mean(b)=3, mean(c)=4.5, weight sum 2.
        // i1: 4 + [1·(0−3) + 1·(5−4.5)]/2 = 2.75
        assert!((rec.scores[1] - 2.75).abs() < 1e-5);
        // i3: 4 + [1·(2−3) + 1·(0−4.5)]/2 = 1.25
        assert!((rec.scores[3] - 1.25).abs() < 1e-5);
        // i0 and i2: 4 − 1.75 = 2.25
        assert!((rec.scores[0] - 2.25).abs() < 1e-5);
        assert!((rec.scores[2] - 2.25).abs() < 1e-5);
    }

    #[test]
    fn test_recommends_only_unrated() {
        let store = sample_store();
        let rec = Collaborative::new(5).recommend(&store, "a").expect("recommend");
        assert_eq!(rec.items, vec!["i1", "i3"]);
    }

    #[test]
    fn test_k_limits_neighborhood() {
        let store = sample_store();
        let cf = Collaborative::new(1);
        let neighbors = cf.neighbors(&store, "a");
        assert_eq!(neighbors.len(), 1);
        // equal similarities: stable ordering keeps the earlier row, user b
        assert_eq!(neighbors[0].0, "b");
    }

    #[test]
    fn test_zero_weight_sum_gives_mean_scores() {
        let mut store = RatingMatrix::new();
        // x and y share no rated item, so every similarity is 0
        store.register("x", "i0");
        store.register("x", "i1");
        store.register("y", "i0");
        store.set_rating("x", "i0", 4.0);
        store.set_rating("y", "i1", 3.0);

        let rec = Collaborative::new(5).recommend(&store, "x").expect("recommend");
        // all scores collapse to the target's own mean, no NaN anywhere
        for idx in 0..rec.scores.len() {
            assert!((rec.scores[idx] - 4.0).abs() < 1e-6);
        }
        assert_eq!(rec.items, vec!["i1"]);
    }

    #[test]
    fn test_unknown_user_is_total() {
        let store = sample_store();
        let rec = Collaborative::new(5).recommend(&store, "ghost").expect("recommend");
        assert!(rec.scores.iter().all(|s| s.is_finite()));
        // everything is unrated for an unknown user
        assert_eq!(rec.items.len(), 4);
    }
}
