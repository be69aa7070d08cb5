//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use sugerir::prelude::*;
//! ```

pub use crate::error::{Result, SugerirError};
pub use crate::metrics::{evaluate, ErrorReport};
pub use crate::primitives::{Matrix, Vector};
pub use crate::ratings::{DatasetConfig, RatingMatrix};
pub use crate::recommend::{
    Collaborative, ContentBased, Popularity, Recommendation, Recommender,
};
pub use crate::text::TfidfVectorizer;
