//! Pivot selection: choosing the reference object(s) the triangle-inequality index
//! projects and prunes against.
//!
//! The reference driver dispatches on a string tag to one of several
//! `CPivotSelection` subclasses. Here that collapses to a single tagged
//! [`PivotStrategyKind`] enum whose variants carry exactly the parameters their
//! algorithm needs, matching the reference's per-method constructor arguments.

mod density;
mod density_dispar;
mod density_peak;
mod dfdispar;
mod fft;
mod random_best;

use rand::Rng;

use crate::store::ObjectSource;

/// Which pivot-selection algorithm a run uses, plus that algorithm's own knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PivotStrategyKind {
    /// Farthest-First Traversal, seeded at `first_pivot_hint`.
    Fft {
        /// Maximum number of pivots to return.
        num_pivots: usize,
        /// Index (within the selection window) to start from.
        first_pivot_hint: usize,
    },
    /// Equal-count projection segments, pivots drawn from the lowest-span segments.
    Density {
        /// Maximum number of pivots to return.
        num_pivots: usize,
        /// Index (within the selection window) the projection is computed against.
        first_pivot_hint: usize,
    },
    /// Equal-distance-range segments walked by a neighbor-count parity decision.
    DensityDisPar {
        /// Maximum number of pivots to return.
        num_pivots: usize,
        /// Index (within the selection window) to re-center the segmentation from.
        first_pivot_hint: usize,
    },
    /// The same equal-distance-range candidate set as `DensityDisPar`, expanded by
    /// farthest-first traversal instead of the parity walk.
    DfDisPar {
        /// Maximum number of pivots to return.
        num_pivots: usize,
        /// Index (within the selection window) to re-center the segmentation from.
        first_pivot_hint: usize,
    },
    /// Single-pivot density-peak selection over the full window.
    DensityPeak {
        /// Index (within the selection window) the projection is computed against.
        first_pivot_hint: usize,
    },
    /// Single-pivot density-peak selection over a random sample of the window.
    DensityPeakFarthest {
        /// Sample size to draw before running the peak procedure.
        rand_size: usize,
    },
    /// Single-pivot selection: farthest-apart sampled pair seeds a peak-density pass
    /// restricted to the sample.
    RandomBest {
        /// Sample size to draw.
        rand_size: usize,
    },
}

impl PivotStrategyKind {
    /// Runs this strategy over the window `[first, first + data_size)` of `store`,
    /// returning object ids (absolute, not window-relative).
    pub fn select(
        &self,
        store: &dyn ObjectSource,
        first: usize,
        data_size: usize,
        rng: &mut impl Rng,
    ) -> Vec<usize> {
        match *self {
            Self::Fft { num_pivots, first_pivot_hint } => {
                fft::select(store, first, data_size, num_pivots, first_pivot_hint)
            }
            Self::Density { num_pivots, first_pivot_hint } => {
                density::select(store, first, data_size, num_pivots, first_pivot_hint)
            }
            Self::DensityDisPar { num_pivots, first_pivot_hint } => {
                density_dispar::select(store, first, data_size, num_pivots, first_pivot_hint)
            }
            Self::DfDisPar { num_pivots, first_pivot_hint } => {
                dfdispar::select(store, first, data_size, num_pivots, first_pivot_hint)
            }
            Self::DensityPeak { first_pivot_hint } => {
                density_peak::select(store, first, data_size, first_pivot_hint)
            }
            Self::DensityPeakFarthest { rand_size } => {
                density_peak::select_sampled(store, first, data_size, rand_size, rng)
            }
            Self::RandomBest { rand_size } => {
                random_best::select(store, first, data_size, rand_size, rng)
            }
        }
    }
}

/// Draws `k` distinct indices from `0..n` (or all of `0..n` if `k >= n`).
fn sample_distinct(n: usize, k: usize, rng: &mut impl Rng) -> Vec<usize> {
    if k >= n {
        return (0..n).collect();
    }
    rand::seq::index::sample(rng, n, k).into_vec()
}
