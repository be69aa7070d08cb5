//! Sugerir: rating-matrix recommender engine in pure Rust.
//!
//! Sugerir loads user/item rating datasets into a dense rating matrix and
//! ranks unrated items for a user through three interchangeable strategies:
//! popularity (vote-shrunk weighted ratings), user-based collaborative
//! filtering, and content-based TF-IDF matching.
//!
//! # Quick Start
//!
//! ```
//! use sugerir::prelude::*;
//!
//! let mut store = RatingMatrix::new();
//! store.register("alice", "dune");
//! store.register("alice", "solaris");
//! store.register("bob", "dune");
//! store.set_rating("alice", "dune", 5.0);
//! store.set_rating("alice", "solaris", 3.0);
//! store.set_rating("bob", "dune", 4.0);
//!
//! let rec = Popularity::new(1).recommend(&store, "bob").expect("candidates");
//! assert_eq!(rec.items, vec!["solaris"]);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`ratings`]: The rating matrix, dataset loading, and snapshot caching
//! - [`text`]: TF-IDF vectorization and stop-word filtering
//! - [`recommend`]: The three recommendation strategies
//! - [`metrics`]: Masked MAE/RMSE prediction evaluation
//! - [`session`]: Item-detail hydration for interactive output
//! - [`error`]: Error types
//! - [`prelude`]: Common imports

#![forbid(unsafe_code)]

pub mod error;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod ratings;
pub mod recommend;
pub mod session;
pub mod text;

pub use error::{Result, SugerirError};
