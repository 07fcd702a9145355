//! Density-segmented-distance pivot selection, grounded directly on the reference's
//! per-segment neighbor-count walk.
//!
//! Unlike [`super::density`], segments are located by binary search over distance
//! positions rather than sliced by equal count, and the walk over them is driven by a
//! parity check between neighboring segments' counts rather than a simple span sort.
//! [`super::dfdispar`] shares the candidate-set construction below but diverges after
//! it into a farthest-first expansion instead of this module's parity walk.

use crate::store::ObjectSource;

/// One slot of the reference's `CKNN` index, repurposed at each stage: first an
/// `(object id, distance)` pair, later a `(position, count)` pair.
#[derive(Clone, Copy)]
struct Entry {
    id: usize,
    dis: f64,
}

/// Binary-searches `sorted` (ascending by `dis`) for the position whose distance sits at
/// or just below `target`, mirroring the reference's `getIndexID`.
fn index_id(sorted: &[Entry], target: f64) -> usize {
    let (mut low, mut high) = (0_i64, sorted.len() as i64 - 1);
    while low <= high {
        let mid = (low + high) / 2;
        let dis = sorted[mid as usize].dis;
        if (dis - target).abs() < f64::EPSILON {
            return mid as usize;
        } else if dis < target {
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }
    // The reference returns `high` uncapped, which can be -1 for a target below every
    // distance; that index is never dereferenced in practice (target 0 always lands at
    // or past the zero-distance entry), so clamping to 0 is a safe-Rust stand-in.
    high.max(0) as usize
}

/// The shared candidate-set construction both `DensityDisPar` and `DFDisPar` build on:
/// segment the window by distance from a re-centered pivot, then collect each segment's
/// midpoint object as a pivot candidate.
pub(super) struct CandidateSet {
    /// Segment midpoint object ids, in original (pre-sort) segment order.
    pub pivot_candidate_set: Vec<usize>,
    /// `(segment index, neighbor count)`, sorted descending by count — the reference's
    /// `neighborNum` after its sort.
    pub neighbor_num: Vec<Entry>,
    /// Neighbor counts aligned with `pivot_candidate_set`'s *sorted* order — the
    /// reference's `segIndex` after its sort.
    pub seg_index_dis: Vec<f64>,
    /// The reference's `perSeg = dataSize / segNum`, integer division.
    pub per_seg: usize,
}

pub(super) fn build_candidate_set(
    store: &dyn ObjectSource,
    first: usize,
    n: usize,
    num_pivots: usize,
    first_pivot_hint: usize,
) -> Option<CandidateSet> {
    if n == 0 || num_pivots == 0 {
        return None;
    }
    let first_pivot = first + first_pivot_hint.min(n - 1);
    let new_first_pivot = (first..first + n)
        .max_by(|&a, &b| {
            store
                .distance(first_pivot, a)
                .partial_cmp(&store.distance(first_pivot, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(first_pivot);

    let mut index: Vec<Entry> = (first..first + n)
        .map(|i| Entry { id: i, dis: store.distance(new_first_pivot, i) })
        .collect();
    index.sort_by(|a, b| a.dis.partial_cmp(&b.dis).unwrap_or(std::cmp::Ordering::Equal));

    let seg_num = if n < num_pivots * 2 { n } else { num_pivots * 2 }.max(10).max(1);
    let per_seg = n / seg_num;
    let seg_dis = index[n - 1].dis / seg_num as f64;

    // seg_index[i].id is a *position* into `index` (from getIndexID), not an object id.
    let mut seg_index: Vec<Entry> = (0..seg_num)
        .map(|i| Entry { id: index_id(&index, i as f64 * seg_dis), dis: 0.0 })
        .collect();
    for i in 0..seg_num.saturating_sub(1) {
        seg_index[i].dis = (seg_index[i + 1].id - seg_index[i].id) as f64;
    }
    if let Some(last) = seg_index.last_mut() {
        last.dis = (n - last.id) as f64;
    }

    let mut neighbor_num: Vec<Entry> = (0..seg_num)
        .map(|i| Entry { id: i, dis: seg_index[i].dis })
        .collect();

    // Both sorts are stable so ties preserve their pre-sort relative order, matching the
    // reference's two independently-populated-then-sorted arrays as closely as a safe
    // port can (the reference's std::sort makes no tie-order guarantee of its own).
    seg_index.sort_by(|a, b| b.dis.partial_cmp(&a.dis).unwrap_or(std::cmp::Ordering::Equal));
    neighbor_num.sort_by(|a, b| b.dis.partial_cmp(&a.dis).unwrap_or(std::cmp::Ordering::Equal));

    let pivot_candidate_set: Vec<usize> = (0..seg_num)
        .map(|i| {
            let pos = seg_index[i].id + (seg_index[i].dis / 2.0) as usize;
            index[pos.min(n - 1)].id
        })
        .collect();
    let seg_index_dis = seg_index.iter().map(|e| e.dis).collect();

    Some(CandidateSet { pivot_candidate_set, neighbor_num, seg_index_dis, per_seg })
}

/// Walks the candidate set's neighbor counts, matching the reference's
/// `neighborNum[i]+neighborNum[i+1]-2*neighborNum[i-1]` parity decision: equal-count
/// neighbors on both sides pick whichever of the pair sits closer to the denser side,
/// otherwise the segment's own candidate is taken and the `perSeg/10` guard (only
/// reachable from this "unequal" arm) can end the walk early.
pub(super) fn select(
    store: &dyn ObjectSource,
    first: usize,
    data_size: usize,
    num_pivots: usize,
    first_pivot_hint: usize,
) -> Vec<usize> {
    let n = data_size.min(store.len().saturating_sub(first));
    let Some(set) = build_candidate_set(store, first, n, num_pivots, first_pivot_hint) else {
        return Vec::new();
    };
    let seg_num = set.neighbor_num.len();
    let mut result = vec![set.pivot_candidate_set[0]];

    let mut i = 1_usize;
    while i < seg_num {
        if i + 1 >= seg_num {
            break;
        }
        let parity = set.neighbor_num[i].id as isize + set.neighbor_num[i + 1].id as isize
            - 2 * set.neighbor_num[i - 1].id as isize;
        if parity == 0 {
            let pivot = if set.neighbor_num[i - 1].id >= seg_num / 2 {
                if set.neighbor_num[i].id < set.neighbor_num[i + 1].id {
                    set.pivot_candidate_set[i]
                } else {
                    set.pivot_candidate_set[i + 1]
                }
            } else if set.neighbor_num[i].id > set.neighbor_num[i + 1].id {
                set.pivot_candidate_set[i]
            } else {
                set.pivot_candidate_set[i + 1]
            };
            result.push(pivot);
            i += 1;
        } else {
            result.push(set.pivot_candidate_set[i]);
            if set.seg_index_dis[i] < (set.per_seg / 10) as f64 {
                break;
            }
        }
        if result.len() == num_pivots {
            break;
        }
        i += 1;
    }
    result
}
