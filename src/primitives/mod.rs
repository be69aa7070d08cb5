//! Core compute primitives (Vector, Matrix).
//!
//! These types carry the rating matrix and every score vector produced by the
//! recommendation strategies.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
