//! Canonical error taxonomy for the detection core.

use thiserror::Error;

/// Errors raised before or during a [`crate::detector::BlockSweepDetector::detect`] run.
///
/// `NoProgress` (a queue filling with fewer than `n` distinct entries) is deliberately
/// not a member of this enum: it is reported through [`crate::DetectionReport::valid`]
/// rather than as an error, since a short Top-N is a valid, well-defined outcome.
#[derive(Debug, Error)]
pub enum DetectError {
    /// A configuration value is out of range for the dataset it will run against.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human-readable explanation of which value was out of range and why.
        message: String,
    },

    /// The dataset itself is unusable (currently: empty).
    #[error("invalid data: {message}")]
    Data {
        /// Human-readable explanation.
        message: String,
    },

    /// A metric returned a value that violates the nonnegativity contract of
    /// [`crate::store::Metric`].
    #[error("metric returned an invalid distance ({value}) for objects {a} and {b}")]
    Metric {
        /// The object on the left of the offending call.
        a: usize,
        /// The object on the right of the offending call.
        b: usize,
        /// The NaN or negative value the metric returned.
        value: f64,
    },
}

impl DetectError {
    /// Builds a [`DetectError::Config`] with a formatted message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Builds a [`DetectError::Data`] with a formatted message.
    #[must_use]
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data { message: message.into() }
    }

    /// Builds a [`DetectError::Metric`] reporting an invalid distance between `a` and `b`.
    #[must_use]
    pub fn metric(a: usize, b: usize, value: f64) -> Self {
        Self::Metric { a, b, value }
    }
}

/// Convenient result alias for detection-core operations.
pub type DetectResult<T> = Result<T, DetectError>;
