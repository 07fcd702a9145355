//! Farthest-First Traversal pivot selection.

use crate::store::ObjectSource;

/// Greedily grows a pivot set starting at `first_pivot_hint`, each new pivot
/// maximizing its minimum distance to the set chosen so far. Ties favor the lower
/// (window-relative) id, which falls out naturally from a strict `>` comparison.
pub(super) fn select(
    store: &dyn ObjectSource,
    first: usize,
    data_size: usize,
    num_pivots: usize,
    first_pivot_hint: usize,
) -> Vec<usize> {
    let n = data_size.min(store.len().saturating_sub(first));
    if n == 0 || num_pivots == 0 {
        return Vec::new();
    }
    let count = num_pivots.min(n);
    let mut min_dist = vec![f64::INFINITY; n];
    let mut next = if first_pivot_hint < n { first_pivot_hint } else { 0 };
    let mut chosen = Vec::with_capacity(count);

    for _ in 0..count {
        chosen.push(first + next);
        for i in 0..n {
            let d = store.distance(first + i, first + next);
            if d < min_dist[i] {
                min_dist[i] = d;
            }
        }
        min_dist[next] = -1.0;

        let mut best = 0;
        let mut best_val = -1.0;
        for (i, &v) in min_dist.iter().enumerate() {
            if v > best_val {
                best_val = v;
                best = i;
            }
        }
        next = best;
    }

    chosen
}
