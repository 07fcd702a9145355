//! Density pivot selection: equal-count projection segments, pivots drawn from the
//! lowest-span (highest-density) segments.

use crate::store::ObjectSource;

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
    let anchor = first_pivot_hint.min(n - 1);
    let d0: Vec<f64> = (0..n).map(|i| store.distance(first + anchor, first + i)).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| d0[a].partial_cmp(&d0[b]).unwrap_or(std::cmp::Ordering::Equal));

    let seg_num = 10usize.max(n.min(2 * num_pivots)).min(n).max(1);
    let base = n / seg_num;
    let rem = n % seg_num;

    let mut segments = Vec::with_capacity(seg_num);
    let mut start = 0;
    for s in 0..seg_num {
        let len = base + usize::from(s < rem);
        if len == 0 {
            continue;
        }
        let end = start + len - 1;
        segments.push((d0[order[end]] - d0[order[start]], start, end));
        start += len;
    }
    segments.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    segments
        .into_iter()
        .take(num_pivots)
        .map(|(_, s, e)| first + order[s + (e - s) / 2])
        .collect()
}
