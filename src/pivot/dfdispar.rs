//! `DFDisPar` pivot selection: the same density-segmented candidate-set construction as
//! [`super::density_dispar`], but expanded into a multi-pivot set by farthest-first
//! traversal over the candidates instead of that module's parity walk.

use super::density_dispar::build_candidate_set;
use crate::store::ObjectSource;

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
    let candidates = set.pivot_candidate_set;
    let seg_num = candidates.len();

    let mut is_center = vec![false; seg_num];
    let mut min_dist = vec![f64::INFINITY; seg_num];
    is_center[0] = true;

    // -1-sentinel slots for centers not yet found, matching the reference's `indices`.
    let mut indices: Vec<i64> = vec![-1; num_pivots];
    indices[0] = candidates[0] as i64;

    for center_size in 1..num_pivots.min(seg_num) {
        let last_center = indices[center_size - 1] as usize;
        let mut curr_max = 0.0_f64;
        let mut chosen = None;
        for (i, &candidate) in candidates.iter().enumerate() {
            if is_center[i] {
                continue;
            }
            let dist = store.distance(candidate, last_center);
            if dist < min_dist[i] {
                min_dist[i] = dist;
            }
            if min_dist[i] > curr_max {
                chosen = Some(i);
                curr_max = min_dist[i];
            }
        }
        let Some(i) = chosen else { break };
        indices[center_size] = candidates[i] as i64;
        is_center[i] = true;
    }

    indices
        .into_iter()
        .take_while(|&id| id >= 0)
        .take(num_pivots)
        .map(|id| id as usize)
        .collect()
}
