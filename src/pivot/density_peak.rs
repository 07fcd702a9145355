//! Density-peak pivot selection: the single object with the most same-shell
//! neighbors, either over the full window or over a random sample of it.

use rand::Rng;

use crate::store::ObjectSource;

fn peak_of(store: &dyn ObjectSource, first: usize, window: &[usize], anchor: usize) -> usize {
    let m = window.len();
    let d0: Vec<f64> = window
        .iter()
        .map(|&i| store.distance(first + anchor, first + i))
        .collect();
    let max_d = d0.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = 0.4 * max_d;

    let mut rho = vec![0u32; m];
    for i in 0..m {
        for j in (i + 1)..m {
            if (d0[i] - d0[j]).abs() < cutoff {
                let dis = store.distance(first + window[i], first + window[j]);
                if dis < cutoff {
                    rho[i] += 1;
                    rho[j] += 1;
                }
            }
        }
    }

    (0..m).max_by_key(|&i| rho[i]).unwrap_or(0)
}

/// Single-pivot density-peak selection over the whole window, projected against
/// `first_pivot_hint`.
pub(super) fn select(
    store: &dyn ObjectSource,
    first: usize,
    data_size: usize,
    first_pivot_hint: usize,
) -> Vec<usize> {
    let n = data_size.min(store.len().saturating_sub(first));
    if n == 0 {
        return Vec::new();
    }
    let anchor = first_pivot_hint.min(n - 1);
    let window: Vec<usize> = (0..n).collect();
    let best = peak_of(store, first, &window, anchor);
    vec![first + window[best]]
}

/// Single-pivot density-peak selection restricted to a `rand_size`-wide sample.
///
/// Mirrors the reference's sampled variant: it scores a `rand_size`-wide sample
/// internally but still returns only one pivot, never `num_pivots` of them.
pub(super) fn select_sampled(
    store: &dyn ObjectSource,
    first: usize,
    data_size: usize,
    rand_size: usize,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let n = data_size.min(store.len().saturating_sub(first));
    if n == 0 {
        return Vec::new();
    }
    let sample = super::sample_distinct(n, rand_size.min(n).max(1), rng);
    let best = peak_of(store, first, &sample, sample[0]);
    vec![first + sample[best]]
}
