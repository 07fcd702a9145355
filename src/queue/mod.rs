//! Bounded, insertion-only ordered containers used to track running outlier state.
//!
//! Both queues here are fixed-capacity arrays rather than a general-purpose heap: the
//! reference algorithm relies on the exact "replace the head, then bubble once" update
//! rule to keep the tie-breaking and pruning behavior of the block sweep deterministic.

use std::cmp::Ordering;

/// A candidate neighbor: an object id paired with a distance (or, in the Top-N queue, a
/// weight).
///
/// Ordering compares `dis` alone; `data_id` never participates in comparisons. The
/// sentinel entry `KnnEntry::empty()` carries `data_id = -1` and `dis = +inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnnEntry {
    /// The neighboring object's id, or `-1` for an unfilled sentinel slot.
    pub data_id: i64,
    /// The distance (or weight) this entry was inserted with.
    pub dis: f64,
}

impl KnnEntry {
    /// A new, real entry.
    #[must_use]
    pub fn new(data_id: usize, dis: f64) -> Self {
        Self {
            data_id: i64::try_from(data_id).unwrap_or(i64::MAX),
            dis,
        }
    }

    /// The sentinel entry used to pre-fill a [`KFarthestQueue`]: `(-1, +inf)`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data_id: -1,
            dis: f64::INFINITY,
        }
    }

    /// The sentinel entry used to pre-fill an [`NHighestQueue`]: `(0, 0)`.
    #[must_use]
    pub fn zero() -> Self {
        Self { data_id: 0, dis: 0.0 }
    }

    /// Whether this entry's `data_id` is a real object (not a sentinel).
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.data_id >= 0
    }
}

impl PartialOrd for KnnEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.dis.partial_cmp(&other.dis)
    }
}

/// Per-object k-nearest-neighbor queue, descending by distance.
///
/// Slot 0 holds the current kNN radius (the largest of the k smallest distances seen so
/// far). Capacity is fixed at construction and never grows or shrinks.
#[derive(Debug, Clone)]
pub struct KFarthestQueue {
    entries: Vec<KnnEntry>,
}

impl KFarthestQueue {
    /// Creates a new queue of capacity `k`, filled with sentinel entries.
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    #[must_use]
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "a k-farthest queue must have positive capacity");
        Self {
            entries: vec![KnnEntry::empty(); k],
        }
    }

    /// The queue's fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Slot 0: the current kNN radius.
    #[must_use]
    pub fn head(&self) -> KnnEntry {
        self.entries[0]
    }

    /// All entries, in descending order.
    #[must_use]
    pub fn entries(&self) -> &[KnnEntry] {
        &self.entries
    }

    /// Attempts to insert `entry`. Accepted iff `entry.dis < head().dis`.
    ///
    /// On acceptance, replaces slot 0 and restores descending order with a single
    /// forward bubble pass, matching the reference `insertQueue(..., isDescend=true)`.
    pub fn try_insert(&mut self, entry: KnnEntry) -> bool {
        if entry.dis >= self.entries[0].dis {
            return false;
        }
        self.entries[0] = entry;
        for i in 1..self.entries.len() {
            if self.entries[i - 1] < self.entries[i] {
                self.entries.swap(i - 1, i);
            }
        }
        true
    }
}

/// The running Top-N outlier queue, ascending by weight.
///
/// Slot 0 is the cutoff `c`; slot `N - 1` is the current best candidate.
#[derive(Debug, Clone)]
pub struct NHighestQueue {
    entries: Vec<KnnEntry>,
}

impl NHighestQueue {
    /// Creates a new queue of capacity `n`, filled with `(0, 0)` sentinels.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "a top-n queue must have positive capacity");
        Self {
            entries: vec![KnnEntry::zero(); n],
        }
    }

    /// The queue's fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Slot `N - 1`: the current best candidate.
    #[must_use]
    pub fn tail(&self) -> KnnEntry {
        self.entries[self.entries.len() - 1]
    }

    /// The current cutoff `c` (the weight at slot 0).
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.entries[0].dis
    }

    /// All entries, in ascending order by weight.
    #[must_use]
    pub fn entries(&self) -> &[KnnEntry] {
        &self.entries
    }

    /// Attempts to insert `entry`. Accepted iff `entry.dis > head().dis` (the cutoff).
    ///
    /// On acceptance, replaces slot 0 and restores ascending order with a single
    /// forward bubble pass, matching the reference `insertQueue(..., isDescend=false)`.
    pub fn try_insert(&mut self, entry: KnnEntry) -> bool {
        if entry.dis <= self.entries[0].dis {
            return false;
        }
        self.entries[0] = entry;
        for i in 1..self.entries.len() {
            if self.entries[i - 1] > self.entries[i] {
                self.entries.swap(i - 1, i);
            }
        }
        true
    }

    /// Returns the entries in descending order (best outlier first), as `(id, weight)`
    /// pairs with the object id converted back to `usize`.
    ///
    /// A fresh queue's sentinel slots are indistinguishable from a real win of weight
    /// `0.0` by object `0` (both are `(0, 0.0)`), so this does not attempt to filter
    /// unfilled slots out; callers truncate to the run's own `valid` count instead.
    #[must_use]
    pub fn descending(&self) -> Vec<(usize, f64)> {
        self.entries
            .iter()
            .rev()
            .map(|e| (usize::try_from(e.data_id.max(0)).unwrap_or(0), e.dis))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_farthest_queue_stays_descending() {
        let mut q = KFarthestQueue::new(3);
        for (id, dis) in [(0, 5.0), (1, 2.0), (2, 9.0), (3, 1.0), (4, 0.5)] {
            q.try_insert(KnnEntry::new(id, dis));
        }
        let dists: Vec<f64> = q.entries().iter().map(|e| e.dis).collect();
        let mut sorted = dists.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(dists, sorted);
        assert!((q.head().dis - 2.0).abs() < 1e-9);
    }

    #[test]
    fn k_farthest_queue_rejects_worse_than_head() {
        let mut q = KFarthestQueue::new(2);
        assert!(q.try_insert(KnnEntry::new(0, 3.0)));
        assert!(q.try_insert(KnnEntry::new(1, 1.0)));
        // head is now 3.0; a 4.0 candidate must be rejected.
        assert!(!q.try_insert(KnnEntry::new(2, 4.0)));
        assert!((q.head().dis - 3.0).abs() < 1e-9);
    }

    #[test]
    fn n_highest_queue_stays_ascending() {
        let mut q = NHighestQueue::new(3);
        for (id, w) in [(0, 5.0), (1, 2.0), (2, 9.0), (3, 1.0), (4, 12.0)] {
            q.try_insert(KnnEntry::new(id, w));
        }
        let weights: Vec<f64> = q.entries().iter().map(|e| e.dis).collect();
        let mut sorted = weights.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(weights, sorted);
        assert!((q.cutoff() - 5.0).abs() < 1e-9);
        assert!((q.tail().dis - 12.0).abs() < 1e-9);
    }

    #[test]
    fn n_highest_queue_descending_view_matches_tail_first() {
        let mut q = NHighestQueue::new(2);
        q.try_insert(KnnEntry::new(0, 1.0));
        q.try_insert(KnnEntry::new(1, 5.0));
        assert_eq!(q.descending(), vec![(1, 5.0), (0, 1.0)]);
    }
}
