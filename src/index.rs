//! The pivot table and projection ordering the block sweep prunes against.

use crate::store::ObjectSource;

/// A precomputed pivot table plus the descending projection order over pivot 0.
///
/// Built once per run from a pivot list and never mutated afterward; every distance
/// the detector skips via [`TriangleIndex::lower_bound`] is one it never has to ask
/// the metric for.
#[derive(Debug, Clone)]
pub struct TriangleIndex {
    /// `table[obj][p]` is the distance from `obj` to `pivots[p]`.
    table: Vec<Vec<f64>>,
    /// Object ids sorted descending by `table[obj][0]`.
    projection_order: Vec<usize>,
}

impl TriangleIndex {
    /// Builds the index for `pivots` over every object in `store`.
    ///
    /// # Panics
    ///
    /// Panics if `pivots` is empty.
    #[must_use]
    pub fn build(store: &dyn ObjectSource, pivots: &[usize]) -> Self {
        assert!(!pivots.is_empty(), "the triangle index needs at least one pivot");
        let size = store.len();
        let table: Vec<Vec<f64>> = (0..size)
            .map(|obj| pivots.iter().map(|&p| store.distance(obj, p)).collect())
            .collect();

        let mut projection_order: Vec<usize> = (0..size).collect();
        projection_order
            .sort_by(|&a, &b| table[b][0].partial_cmp(&table[a][0]).unwrap_or(std::cmp::Ordering::Equal));

        Self { table, projection_order }
    }

    /// The number of objects indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projection_order.len()
    }

    /// Whether no objects were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projection_order.is_empty()
    }

    /// The number of pivots the index was built with.
    #[must_use]
    pub fn num_pivots(&self) -> usize {
        self.table.first().map_or(0, Vec::len)
    }

    /// Object ids sorted descending by projection distance.
    #[must_use]
    pub fn projection_order(&self) -> &[usize] {
        &self.projection_order
    }

    /// `obj`'s distance to pivot 0.
    #[must_use]
    pub fn projection_distance(&self, obj: usize) -> f64 {
        self.table[obj][0]
    }

    /// A lower bound on `metric.distance(a, b)`, derived purely from the pivot table
    /// via the triangle inequality: `max_p |table[a][p] - table[b][p]|`.
    #[must_use]
    pub fn lower_bound(&self, a: usize, b: usize) -> f64 {
        self.table[a]
            .iter()
            .zip(&self.table[b])
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FlatObjectStore, Metric, MetricObject};

    struct Euclidean;
    impl Metric<Vec<f64>> for Euclidean {
        fn distance(&self, a: &Vec<f64>, b: &Vec<f64>) -> f64 {
            a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
        }
    }

    fn store() -> FlatObjectStore<Vec<f64>, Euclidean> {
        FlatObjectStore::new(
            vec![
                MetricObject::normal(vec![0.0]),
                MetricObject::normal(vec![1.0]),
                MetricObject::normal(vec![5.0]),
                MetricObject::normal(vec![10.0]),
            ],
            Euclidean,
        )
    }

    #[test]
    fn projection_order_is_descending() {
        let store = store();
        let index = TriangleIndex::build(&store, &[0]);
        let dists: Vec<f64> = index.projection_order().iter().map(|&o| index.projection_distance(o)).collect();
        let mut sorted = dists.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(dists, sorted);
        assert_eq!(index.projection_order()[0], 3);
    }

    #[test]
    fn lower_bound_never_exceeds_true_distance() {
        let store = store();
        let index = TriangleIndex::build(&store, &[0, 2]);
        for a in 0..store.len() {
            for b in 0..store.len() {
                let lb = index.lower_bound(a, b);
                let d = store.distance(a, b);
                assert!(lb <= d + 1e-9, "lower bound {lb} exceeded true distance {d}");
            }
        }
    }
}
