//! The user×item rating matrix and its aggregates.
//!
//! [`RatingMatrix`] is the read-only core every recommendation strategy consumes:
//! a dense matrix of ratings indexed by stable integer positions, with id→index
//! mappings built once at load time. Cell value `0.0` is the sentinel for
//! "no rating"; rating domains must exclude 0 or the sentinel collides with a
//! real score.

mod load;
mod snapshot;

pub use load::{BadLine, DatasetConfig};
pub use snapshot::{load_snapshot, load_snapshot_or_build, save_snapshot};

use crate::error::{Result, SugerirError};
use crate::primitives::{Matrix, Vector};
use std::collections::HashMap;

/// Dense user×item rating matrix with stable id→index mappings.
///
/// Users map to rows and items to columns, both in first-seen order with dense
/// indices `0..n`. Built once per session; immutable afterwards.
///
/// # Examples
///
/// ```
/// use sugerir::ratings::RatingMatrix;
///
/// let mut store = RatingMatrix::new();
/// store.register("alice", "dune");
/// store.register("bob", "solaris");
/// store.set_rating("alice", "dune", 5.0);
///
/// assert_eq!(store.vote_count("dune"), 1);
/// assert!(store.is_unrated("bob", "dune"));
/// assert!((store.average_for_item("dune") - 5.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    user_ids: Vec<String>,
    item_ids: Vec<String>,
    user_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
    matrix: Matrix<f32>,
    /// Free-text feature field per item, aligned to `item_ids`. Empty string
    /// when the catalog had nothing for the item.
    features: Vec<String>,
}

impl Default for RatingMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingMatrix {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_ids: Vec::new(),
            item_ids: Vec::new(),
            user_index: HashMap::new(),
            item_index: HashMap::new(),
            matrix: Matrix::zeros(0, 0),
            features: Vec::new(),
        }
    }

    /// Rebuilds a store from snapshot parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length doesn't match users × items or the
    /// feature list isn't aligned to the item list.
    pub fn from_parts(
        user_ids: Vec<String>,
        item_ids: Vec<String>,
        data: Vec<f32>,
        features: Vec<String>,
    ) -> Result<Self> {
        if features.len() != item_ids.len() {
            return Err(SugerirError::length_mismatch(item_ids.len(), features.len()));
        }
        let matrix = Matrix::from_vec(user_ids.len(), item_ids.len(), data)
            .map_err(|e| SugerirError::Snapshot(e.to_string()))?;
        let user_index = user_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let item_index = item_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Ok(Self {
            user_ids,
            item_ids,
            user_index,
            item_index,
            matrix,
            features,
        })
    }

    /// Number of distinct users.
    #[must_use]
    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    /// User ids in row order.
    #[must_use]
    pub fn user_ids(&self) -> &[String] {
        &self.user_ids
    }

    /// Item ids in column order.
    #[must_use]
    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    /// True if the user id has been registered.
    #[must_use]
    pub fn contains_user(&self, user_id: &str) -> bool {
        self.user_index.contains_key(user_id)
    }

    /// True if the item id has been registered.
    #[must_use]
    pub fn contains_item(&self, item_id: &str) -> bool {
        self.item_index.contains_key(item_id)
    }

    /// Registers a user id, assigning the next free row index the first time
    /// it is seen. Idempotent for known ids.
    pub fn register_user(&mut self, user_id: &str) -> usize {
        if let Some(&row) = self.user_index.get(user_id) {
            return row;
        }
        let row = self.user_ids.len();
        self.user_ids.push(user_id.to_string());
        self.user_index.insert(user_id.to_string(), row);
        row
    }

    /// Registers an item id, assigning the next free column index the first
    /// time it is seen. Idempotent for known ids.
    pub fn register_item(&mut self, item_id: &str) -> usize {
        if let Some(&col) = self.item_index.get(item_id) {
            return col;
        }
        let col = self.item_ids.len();
        self.item_ids.push(item_id.to_string());
        self.item_index.insert(item_id.to_string(), col);
        self.features.push(String::new());
        col
    }

    /// Registers a (user, item) pair and returns their (row, col) indices.
    pub fn register(&mut self, user_id: &str, item_id: &str) -> (usize, usize) {
        (self.register_user(user_id), self.register_item(item_id))
    }

    /// Stores a rating. Silent no-op when either id was never registered,
    /// reproducing the skip-unknown-id ingestion policy. The value is stored
    /// as-is; 0 is indistinguishable from unrated.
    pub fn set_rating(&mut self, user_id: &str, item_id: &str, value: f32) {
        let (Some(&row), Some(&col)) = (self.user_index.get(user_id), self.item_index.get(item_id))
        else {
            return;
        };
        self.ensure_shape();
        self.matrix.set(row, col, value);
    }

    /// Attaches the free-text feature field for an item. Silent no-op for
    /// unknown items.
    pub fn set_feature(&mut self, item_id: &str, text: &str) {
        if let Some(&col) = self.item_index.get(item_id) {
            self.features[col] = text.to_string();
        }
    }

    /// Reallocates the backing matrix when registration has outgrown it.
    /// Existing cells are preserved; new cells start unrated.
    fn ensure_shape(&mut self) {
        let (rows, cols) = (self.user_ids.len(), self.item_ids.len());
        if self.matrix.shape() == (rows, cols) {
            return;
        }
        let (old_rows, old_cols) = self.matrix.shape();
        let mut grown = Matrix::zeros(rows, cols);
        for r in 0..old_rows.min(rows) {
            for c in 0..old_cols.min(cols) {
                grown.set(r, c, self.matrix.get(r, c));
            }
        }
        self.matrix = grown;
    }

    /// Cell read tolerant of a backing matrix that lags registration.
    /// Unmaterialized cells are unrated by definition.
    fn cell(&self, row: usize, col: usize) -> f32 {
        let (rows, cols) = self.matrix.shape();
        if row < rows && col < cols {
            self.matrix.get(row, col)
        } else {
            0.0
        }
    }

    /// Mean of the non-zero ratings in the item's column. Returns 0.0 when
    /// the item has no votes or the id is unknown.
    #[must_use]
    pub fn average_for_item(&self, item_id: &str) -> f32 {
        let Some(&col) = self.item_index.get(item_id) else {
            return 0.0;
        };
        self.nonzero_mean((0..self.n_users()).map(|row| self.cell(row, col)))
    }

    /// Mean of the non-zero ratings in the user's row. Returns 0.0 when the
    /// user has no ratings or the id is unknown.
    #[must_use]
    pub fn average_for_user(&self, user_id: &str) -> f32 {
        let Some(&row) = self.user_index.get(user_id) else {
            return 0.0;
        };
        self.nonzero_mean((0..self.n_items()).map(|col| self.cell(row, col)))
    }

    fn nonzero_mean(&self, values: impl Iterator<Item = f32>) -> f32 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values {
            if v != 0.0 {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }

    /// Number of users who rated this item. 0 for unknown ids.
    #[must_use]
    pub fn vote_count(&self, item_id: &str) -> usize {
        let Some(&col) = self.item_index.get(item_id) else {
            return 0;
        };
        (0..self.n_users())
            .filter(|&row| self.cell(row, col) != 0.0)
            .count()
    }

    /// Items with at least `threshold` votes, in column-index order.
    #[must_use]
    pub fn items_with_min_votes(&self, threshold: usize) -> Vec<String> {
        self.item_ids
            .iter()
            .filter(|id| self.vote_count(id) >= threshold)
            .cloned()
            .collect()
    }

    /// Arithmetic mean of `average_for_item` over the given subset. Unknown
    /// ids are silently excluded.
    ///
    /// # Errors
    ///
    /// Returns [`SugerirError::EmptyCandidates`] when no known item remains.
    pub fn global_average<S: AsRef<str>>(&self, item_ids: &[S]) -> Result<f32> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for id in item_ids {
            if self.contains_item(id.as_ref()) {
                sum += self.average_for_item(id.as_ref());
                count += 1;
            }
        }
        if count == 0 {
            return Err(SugerirError::empty_candidates("global item average"));
        }
        Ok(sum / count as f32)
    }

    /// True iff the cell is exactly 0, or either id is unknown. Unknown ids
    /// are unrated by definition, never a fault.
    #[must_use]
    pub fn is_unrated(&self, user_id: &str, item_id: &str) -> bool {
        let (Some(&row), Some(&col)) = (self.user_index.get(user_id), self.item_index.get(item_id))
        else {
            return true;
        };
        self.cell(row, col) == 0.0
    }

    /// Cosine similarity between two users, computed only over the dimensions
    /// where both have a non-zero rating. Zero entries contribute to neither
    /// the dot product nor the norms, so the value reflects commonly-rated
    /// items only. Returns 0.0 on no overlap, zero norms, a zero dot product,
    /// or unknown ids: no shared evidence means dissimilar, not an error.
    #[must_use]
    pub fn similarity(&self, user_a: &str, user_b: &str) -> f32 {
        let (Some(&row_a), Some(&row_b)) =
            (self.user_index.get(user_a), self.user_index.get(user_b))
        else {
            return 0.0;
        };
        let mut dot = 0.0_f32;
        let mut norm_a_sq = 0.0_f32;
        let mut norm_b_sq = 0.0_f32;
        for col in 0..self.n_items() {
            let a = self.cell(row_a, col);
            let b = self.cell(row_b, col);
            if a != 0.0 && b != 0.0 {
                dot += a * b;
                norm_a_sq += a * a;
                norm_b_sq += b * b;
            }
        }
        if dot != 0.0 && norm_a_sq != 0.0 && norm_b_sq != 0.0 {
            dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt())
        } else {
            0.0
        }
    }

    /// The user's full rating row, aligned to item column order. All zeros
    /// for an unknown user.
    #[must_use]
    pub fn ratings_vector(&self, user_id: &str) -> Vector<f32> {
        let Some(&row) = self.user_index.get(user_id) else {
            return Vector::zeros(self.n_items());
        };
        Vector::from_vec((0..self.n_items()).map(|col| self.cell(row, col)).collect())
    }

    /// Global maximum rating over the whole matrix. Used to rescale
    /// normalized content scores back into the rating range.
    #[must_use]
    pub fn max_rating(&self) -> f32 {
        self.matrix.max()
    }

    /// Free-text feature fields for the given items, in registration
    /// (column-index) order. Unknown ids are silently skipped.
    #[must_use]
    pub fn item_text_features<S: AsRef<str>>(&self, item_ids: &[S]) -> Vec<String> {
        let mut cols: Vec<usize> = item_ids
            .iter()
            .filter_map(|id| self.item_index.get(id.as_ref()).copied())
            .collect();
        cols.sort_unstable();
        cols.dedup();
        cols.into_iter()
            .map(|col| self.features[col].clone())
            .collect()
    }

    /// Snapshot accessors: flat rating cells in row-major order.
    pub(crate) fn matrix_data(&self) -> Vec<f32> {
        let (rows, cols) = (self.n_users(), self.n_items());
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(self.cell(row, col));
            }
        }
        data
    }

    pub(crate) fn features(&self) -> &[String] {
        &self.features
    }
}
