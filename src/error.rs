//! Error types for sugerir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for sugerir operations.
///
/// Covers ingestion failures, empty aggregation sets, and the recoverable
/// "not enough ratings to evaluate" condition.
///
/// # Examples
///
/// ```
/// use sugerir::error::SugerirError;
///
/// let err = SugerirError::EmptyCandidates {
///     context: "min-vote filter".to_string(),
/// };
/// assert!(err.to_string().contains("no candidate items"));
/// ```
#[derive(Debug)]
pub enum SugerirError {
    /// Vectors passed to an aligned operation have different lengths.
    DimensionMismatch {
        /// Expected length description
        expected: String,
        /// Actual length found
        actual: String,
    },

    /// An aggregate was requested over an empty candidate set.
    EmptyCandidates {
        /// Which aggregation had no input
        context: String,
    },

    /// The ground-truth vector has no non-zero ratings, so MAE/RMSE are
    /// undefined. Recoverable: pick a user with more ratings.
    InsufficientRatings {
        /// Number of non-zero ground-truth entries found
        non_zero: usize,
    },

    /// A record in an input stream could not be parsed and the dataset is
    /// configured to treat parse errors as fatal.
    Parse {
        /// Source file
        path: String,
        /// 1-based record number (after the header)
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Snapshot encode/decode failure.
    Snapshot(String),

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SugerirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SugerirError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            SugerirError::EmptyCandidates { context } => {
                write!(f, "no candidate items: {context}")
            }
            SugerirError::InsufficientRatings { non_zero } => {
                write!(
                    f,
                    "insufficient ratings to evaluate: {non_zero} non-zero ground-truth entries"
                )
            }
            SugerirError::Parse {
                path,
                line,
                message,
            } => {
                write!(f, "parse error in {path} at record {line}: {message}")
            }
            SugerirError::Snapshot(msg) => write!(f, "snapshot error: {msg}"),
            SugerirError::Io(e) => write!(f, "I/O error: {e}"),
            SugerirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SugerirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SugerirError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SugerirError {
    fn from(err: std::io::Error) -> Self {
        SugerirError::Io(err)
    }
}

impl From<&str> for SugerirError {
    fn from(msg: &str) -> Self {
        SugerirError::Other(msg.to_string())
    }
}

impl From<String> for SugerirError {
    fn from(msg: String) -> Self {
        SugerirError::Other(msg)
    }
}

impl SugerirError {
    /// Create an empty-input error for an aggregation.
    #[must_use]
    pub fn empty_candidates(context: &str) -> Self {
        Self::EmptyCandidates {
            context: context.to_string(),
        }
    }

    /// Create a dimension mismatch error from two lengths.
    #[must_use]
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SugerirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = SugerirError::length_mismatch(4, 3);
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_empty_candidates_display() {
        let err = SugerirError::empty_candidates("global average");
        assert!(err.to_string().contains("no candidate items"));
        assert!(err.to_string().contains("global average"));
    }

    #[test]
    fn test_insufficient_ratings_display() {
        let err = SugerirError::InsufficientRatings { non_zero: 0 };
        assert!(err.to_string().contains("insufficient ratings"));
    }

    #[test]
    fn test_parse_display() {
        let err = SugerirError::Parse {
            path: "ratings.csv".to_string(),
            line: 12,
            message: "bad rating field".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ratings.csv"));
        assert!(msg.contains("12"));
        assert!(msg.contains("bad rating field"));
    }

    #[test]
    fn test_from_io_error() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SugerirError = io_err.into();
        assert!(matches!(err, SugerirError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_str_and_string() {
        let err: SugerirError = "plain".into();
        assert_eq!(err.to_string(), "plain");
        let err: SugerirError = "owned".to_string().into();
        assert!(matches!(err, SugerirError::Other(_)));
    }
}
