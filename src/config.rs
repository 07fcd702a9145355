//! Typed, `serde`-(de)serializable carriers for a run's inputs and outputs, replacing
//! the reference driver's positional CLI arguments and hardcoded result files.

use serde::{Deserialize, Serialize};

use crate::error::{DetectError, DetectResult};
use crate::outlier::OutlierKind;
use crate::pivot::PivotStrategyKind;

/// Every knob a detection run needs, validated once up front via [`Self::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Size of the Top-N outlier list to return.
    pub n: usize,
    /// Number of consecutive projection-ordered objects processed per block.
    pub block_size: usize,
    /// Which outlier definition to score objects with.
    pub outlier: OutlierKind,
    /// Which pivot-selection algorithm to index with.
    pub pivot: PivotStrategyKind,
}

impl DetectionConfig {
    /// Validates this configuration against a dataset of `size` objects.
    ///
    /// Checks, in order: `size` is nonzero, `n <= size`, `k < size`, and
    /// `block_size > 0`. Mirrors §7's `ConfigError` taxonomy; called before any
    /// allocation so a bad configuration never touches the store.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Data`] if `size == 0`, or [`DetectError::Config`] for any
    /// out-of-range knob.
    pub fn validate(&self, size: usize) -> DetectResult<()> {
        if size == 0 {
            return Err(DetectError::data("the object store is empty"));
        }
        if self.n == 0 {
            return Err(DetectError::config("n must be at least 1"));
        }
        if self.n > size {
            return Err(DetectError::config(format!(
                "n ({}) exceeds the dataset size ({size})",
                self.n
            )));
        }
        let k = self.outlier.k();
        if k == 0 {
            return Err(DetectError::config("k must be at least 1"));
        }
        if k >= size {
            return Err(DetectError::config(format!(
                "k ({k}) must be less than the dataset size ({size})"
            )));
        }
        if self.outlier.queue_capacity() > size {
            return Err(DetectError::config(format!(
                "the outlier definition's neighbor window ({}) exceeds the dataset size ({size})",
                self.outlier.queue_capacity()
            )));
        }
        if self.block_size == 0 {
            return Err(DetectError::config("block_size must be at least 1"));
        }
        Ok(())
    }
}

/// A finished run's headline result plus the bookkeeping a caller needs to judge it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// The Top-N list, descending by weight, as `(object_id, weight)` pairs.
    pub top_n: Vec<(usize, f64)>,
    /// How many of `top_n`'s slots hold a distinct valid entry (may be less than `n`
    /// if the queue never filled — see `NoProgress` in §7).
    pub valid: usize,
    /// The final cutoff `c` the Top-N queue converged to.
    pub cutoff: f64,
    /// The number of true-distance (not lower-bound) computations the run made.
    pub distance_calls: u64,
}
