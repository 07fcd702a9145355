//! Shared fixtures for the integration suite: a Euclidean metric and a brute-force
//! reference implementation of `KthOutlier`/`KnnOutlier` to check the pruned sweep
//! against.

use orca_outliers::store::{FlatObjectStore, Metric, MetricObject, ObjectSource};

/// Plain Euclidean distance over `Vec<f64>` points.
pub struct Euclidean;

impl Metric<Vec<f64>> for Euclidean {
    fn distance(&self, a: &Vec<f64>, b: &Vec<f64>) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
    }
}

/// Builds a store of normal (non-ground-truth-outlier) points.
#[must_use]
pub fn store_from(points: &[Vec<f64>]) -> FlatObjectStore<Vec<f64>, Euclidean> {
    FlatObjectStore::new(points.iter().cloned().map(MetricObject::normal).collect(), Euclidean)
}

/// A nested-loop reference Top-N for `KthOutlier` (`sum_of_k = false`) or `KnnOutlier`
/// (`sum_of_k = true`), descending by weight, truncated to `n`.
#[must_use]
pub fn brute_force_top_n(store: &dyn ObjectSource, k: usize, n: usize, sum_of_k: bool) -> Vec<(usize, f64)> {
    let size = store.len();
    let mut weights = Vec::with_capacity(size);
    for i in 0..size {
        let mut dists: Vec<f64> = (0..size).filter(|&j| j != i).map(|j| store.distance(i, j)).collect();
        dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let weight = if sum_of_k { dists[..k].iter().sum() } else { dists[k - 1] };
        weights.push((i, weight));
    }
    weights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    weights.truncate(n);
    weights
}
