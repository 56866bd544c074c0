use std::error::Error;
use std::fmt;

/// Failures surfaced by fitting, projection, and variance queries.
///
/// Every variant is unrecoverable at the point of detection: the library
/// performs no internal retries and never falls back from one solver to the
/// other. Errors propagate to the caller unmodified.
#[derive(Debug, Clone, PartialEq)]
pub enum PcaError {
    /// The underlying eigen-decomposition or SVD failed to converge, or the
    /// input contained non-finite values.
    Decomposition(String),
    /// A projection or variance query was attempted before a successful fit.
    NotFitted,
    /// Data passed to `transform` disagrees with the fitted dimensionality.
    ShapeMismatch { expected: usize, actual: usize },
    /// Total variance is zero (constant input data), so the explained
    /// variance ratio is undefined.
    DegenerateVariance,
    /// `fit` was given an empty matrix or fewer than two observations, for
    /// which the (n - 1)-divisor variance estimators are undefined.
    TooFewSamples { n_samples: usize },
}

impl fmt::Display for PcaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcaError::Decomposition(detail) => write!(f, "Decomposition failed: {}", detail),
            PcaError::NotFitted => write!(f, "PCA model has not been fitted yet."),
            PcaError::ShapeMismatch { expected, actual } => write!(
                f,
                "Input has {} features but the model was fitted with {}.",
                actual, expected
            ),
            PcaError::DegenerateVariance => write!(
                f,
                "Total variance is zero; the explained variance ratio is undefined."
            ),
            PcaError::TooFewSamples { n_samples } => write!(
                f,
                "Input matrix must have at least 2 samples and 1 feature, got {} samples.",
                n_samples
            ),
        }
    }
}

impl Error for PcaError {}
