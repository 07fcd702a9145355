//! Random-best pivot selection: a sampled farthest-apart pair seeds a peak-density
//! pass over the same sample.

use rand::Rng;

use crate::store::ObjectSource;

pub(super) fn select(
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
    let sample_size = rand_size.max(2).min(n);
    let sample = super::sample_distinct(n, sample_size, rng);
    let m = sample.len();
    if m < 2 {
        return vec![first + sample[0]];
    }

    let mut seed = (0, 1);
    let mut seed_dist = -1.0;
    for i in 0..m {
        for j in (i + 1)..m {
            let d = store.distance(first + sample[i], first + sample[j]);
            if d > seed_dist {
                seed_dist = d;
                seed = (i, j);
            }
        }
    }

    let anchor = sample[seed.0];
    let d0: Vec<f64> = sample.iter().map(|&i| store.distance(first + anchor, first + i)).collect();
    let cutoff = 0.4 * seed_dist;

    let mut rho = vec![0u32; m];
    for i in 0..m {
        for j in (i + 1)..m {
            if (d0[i] - d0[j]).abs() < cutoff {
                let dis = store.distance(first + sample[i], first + sample[j]);
                if dis < cutoff {
                    rho[i] += 1;
                    rho[j] += 1;
                }
            }
        }
    }

    let best = (0..m).max_by_key(|&i| rho[i]).unwrap_or(0);
    vec![first + sample[best]]
}
