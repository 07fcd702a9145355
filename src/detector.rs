//! The block-sweep detector: the algorithm everything else in this crate exists to
//! support.

use ftlog::{debug, info, trace};
use rand::Rng;

use crate::config::{DetectionConfig, DetectionReport};
use crate::error::{DetectError, DetectResult};
use crate::index::TriangleIndex;
use crate::outlier::{HiddenCandidate, HiddenCandidateSet, OutlierState};
use crate::queue::{KnnEntry, NHighestQueue};
use crate::store::ObjectSource;

/// Runs the pivot-indexed block sweep over a store, per the configured outlier
/// definition, pivot strategy, `k`, `n`, and `block_size`.
pub struct BlockSweepDetector<'a> {
    store: &'a dyn ObjectSource,
    index: TriangleIndex,
    config: DetectionConfig,
}

impl<'a> BlockSweepDetector<'a> {
    /// Validates `config` against `store`, selects pivots, and builds the index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DetectError`] if `config` does not fit `store` (§7).
    pub fn new(store: &'a dyn ObjectSource, config: DetectionConfig, rng: &mut impl Rng) -> DetectResult<Self> {
        config.validate(store.len())?;
        let window = config.block_size.min(store.len());
        let mut pivots = config.pivot.select(store, 0, window, rng);
        if pivots.is_empty() {
            pivots.push(0);
        }
        info!("selected {} pivot(s) from a window of {window} objects", pivots.len());
        let index = TriangleIndex::build(store, &pivots);
        Ok(Self { store, index, config })
    }

    /// Runs the sweep to completion and returns the full result.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Metric`] if the injected metric returns a NaN or negative
    /// distance (§7); in debug builds this is also caught earlier by a `debug_assert!`
    /// in the hot path.
    pub fn detect(&self) -> DetectResult<DetectionReport> {
        let size = self.store.len();
        let k = self.config.outlier.k();
        let n = self.config.n;
        let block_size = self.config.block_size;
        let order = self.index.projection_order();
        let is_hodc = self.config.outlier.is_hodc();

        let mut states: Vec<OutlierState> =
            (0..size).map(|_| self.config.outlier.new_state()).collect();
        let mut top_n = NHighestQueue::new(n);
        let mut candidates = HiddenCandidateSet::new();
        let mut valid = 0usize;
        let mut c = 0.0_f64;
        let mut distance_calls = 0_u64;

        let pivot_k_dis = self.index.projection_distance(order[size - k]);

        let mut block_start = 0;
        while block_start < size {
            let block_end = (block_start + block_size).min(size);
            let block = &order[block_start..block_end];

            let first_proj = self.index.projection_distance(block[0]);
            if first_proj + pivot_k_dis < c {
                info!("early termination at block starting {block_start}, c={c}");
                break;
            }

            let avg_dis =
                block.iter().map(|&b| self.index.projection_distance(b)).sum::<f64>() / block.len() as f64;
            let start_id = self.start_id_for(avg_dis);
            trace!("block [{block_start}, {block_end}) avg_dis={avg_dis} start_id={start_id}");

            for d in 0..size {
                let pos = spiral(d, start_id, size);
                let q = order[pos];

                for &b in block {
                    if b == q {
                        continue;
                    }
                    let state = &mut states[b];
                    if !state.active() {
                        continue;
                    }
                    if self.index.lower_bound(b, q) > state.knn().head().dis {
                        continue;
                    }
                    let dis = self.store.distance(b, q);
                    distance_calls += 1;
                    debug_assert!(
                        dis.is_finite() && dis >= 0.0,
                        "metric returned invalid distance {dis} for objects {b} and {q}"
                    );
                    if !dis.is_finite() || dis < 0.0 {
                        return Err(DetectError::metric(b, q, dis));
                    }
                    state.try_insert_neighbor(q, dis, c);
                }
            }

            for &b in block {
                let state = &mut states[b];
                if !state.active() {
                    continue;
                }
                let weight = state.weight();
                if top_n.try_insert(KnnEntry::new(b, weight)) {
                    valid += 1;
                    c = top_n.cutoff();
                    debug!("block {block_start}: object {b} entered top-n, c={c}");
                } else if is_hodc && state.nk_weight() > c {
                    candidates.push(HiddenCandidate::snapshot(b, state));
                }
            }
            if is_hodc {
                candidates.truncate_below(c);
            }

            block_start = block_end;
        }

        let mut top_n_desc = top_n.descending();
        if is_hodc && !candidates.is_empty() {
            info!("deflating {} hidden candidate(s)", candidates.len());
            top_n_desc = candidates.deflate(top_n_desc);
        }

        let valid = valid.min(n);
        if valid < n {
            top_n_desc.truncate(valid);
        }

        Ok(DetectionReport {
            top_n: top_n_desc,
            valid,
            cutoff: c,
            distance_calls,
        })
    }

    /// Binary-searches the projection order (descending) for the smallest index whose
    /// projection distance is at or below `avg_dis`.
    fn start_id_for(&self, avg_dis: f64) -> usize {
        let order = self.index.projection_order();
        let mut lo = 0usize;
        let mut hi = order.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.index.projection_distance(order[mid]) <= avg_dis {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo.min(order.len() - 1)
    }
}

/// The spiral query-visitation order around `start_id`: interleaves positions on
/// either side of the start, exhausting whichever tail runs out first.
fn spiral(d: usize, start_id: usize, size: usize) -> usize {
    let d = d as isize;
    let start_id = start_id as isize;
    let size = size as isize;
    let pos = if start_id < size / 2 && d > 2 * start_id {
        d
    } else if start_id > size / 2 && d >= 2 * (size - start_id) {
        size - d - 1
    } else if d % 2 == 1 {
        start_id - (d + 1) / 2
    } else {
        start_id + d / 2
    };
    pos.clamp(0, size - 1) as usize
}
