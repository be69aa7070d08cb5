//! Prediction-accuracy metrics.
//!
//! MAE and RMSE between a predicted-score vector and a ground-truth rating
//! vector, both aligned by item index. Only positions where the ground truth
//! is non-zero participate: an unrated cell says nothing about prediction
//! quality.

use crate::error::{Result, SugerirError};
use crate::primitives::Vector;

/// MAE and RMSE over the rated positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport {
    /// Mean absolute error.
    pub mae: f32,
    /// Root-mean-square error.
    pub rmse: f32,
    /// Number of non-zero ground-truth positions evaluated.
    pub n_rated: usize,
}

/// Evaluate predictions against known ratings.
///
/// # Errors
///
/// Returns [`SugerirError::DimensionMismatch`] when the vectors differ in
/// length, and [`SugerirError::InsufficientRatings`] when the ground truth is
/// entirely zero — a recoverable condition; the caller should surface a user
/// with more ratings instead.
///
/// # Examples
///
/// ```
/// use sugerir::metrics::evaluate;
/// use sugerir::primitives::Vector;
///
/// let predicted = Vector::from_slice(&[4.0, 0.0, 3.5]);
/// let actual = Vector::from_slice(&[5.0, 0.0, 3.0]);
/// let report = evaluate(&predicted, &actual).expect("two rated positions");
/// assert!((report.mae - 0.75).abs() < 1e-6);
/// ```
pub fn evaluate(predicted: &Vector<f32>, actual: &Vector<f32>) -> Result<ErrorReport> {
    if predicted.len() != actual.len() {
        return Err(SugerirError::length_mismatch(actual.len(), predicted.len()));
    }

    let mut abs_sum = 0.0_f32;
    let mut sq_sum = 0.0_f32;
    let mut n_rated = 0usize;
    for (p, a) in predicted.iter().zip(actual.iter()) {
        if *a != 0.0 {
            let diff = p - a;
            abs_sum += diff.abs();
            sq_sum += diff * diff;
            n_rated += 1;
        }
    }

    if n_rated == 0 {
        return Err(SugerirError::InsufficientRatings { non_zero: 0 });
    }

    let n = n_rated as f32;
    Ok(ErrorReport {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        n_rated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_mae_rmse() {
        let predicted = Vector::from_slice(&[4.0, 0.0, 3.5]);
        let actual = Vector::from_slice(&[5.0, 0.0, 3.0]);
        let report = evaluate(&predicted, &actual).expect("evaluate");
        assert_eq!(report.n_rated, 2);
        assert!((report.mae - 0.75).abs() < 1e-6);
        // sqrt((1.0 + 0.25) / 2) ≈ 0.7906
        assert!((report.rmse - 0.790_569_4).abs() < 1e-5);
    }

    #[test]
    fn test_zero_ground_truth_positions_are_ignored() {
        // a wildly wrong prediction at an unrated position changes nothing
        let predicted = Vector::from_slice(&[4.0, 100.0, 3.5]);
        let actual = Vector::from_slice(&[5.0, 0.0, 3.0]);
        let report = evaluate(&predicted, &actual).expect("evaluate");
        assert!((report.mae - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_all_zero_ground_truth_is_recoverable() {
        let predicted = Vector::from_slice(&[1.0, 2.0]);
        let actual = Vector::zeros(2);
        let err = evaluate(&predicted, &actual).unwrap_err();
        assert!(matches!(err, SugerirError::InsufficientRatings { non_zero: 0 }));
    }

    #[test]
    fn test_length_mismatch_errors() {
        let predicted = Vector::from_slice(&[1.0]);
        let actual = Vector::from_slice(&[1.0, 2.0]);
        assert!(evaluate(&predicted, &actual).is_err());
    }

    #[test]
    fn test_perfect_prediction() {
        let v = Vector::from_slice(&[3.0, 4.0, 5.0]);
        let report = evaluate(&v, &v).expect("evaluate");
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.n_rated, 3);
    }
}
