//! Outlier definitions: what an object's k-nearest-neighbor distances mean for a score.
//!
//! The reference implementation dispatches through a `COutlierDefinition` base class
//! with a virtual `CreateInstance`. Here that collapses to a tagged [`OutlierKind`] plus
//! a single [`OutlierState`] whose layout covers the union of fields every variant needs
//! (the HODC-only `nk_weight` and `neighbor_flag` bitset are simply unused for the plain
//! variants).

use crate::queue::{KFarthestQueue, KnnEntry};

/// Which outlier definition a detection run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutlierKind {
    /// `weight = knn[0].dis`, the k-th nearest neighbor's distance.
    Kth {
        /// Number of neighbors tracked.
        k: usize,
    },
    /// `weight = sum(knn[0..k].dis)`, the sum of the k nearest neighbors' distances.
    Knn {
        /// Number of neighbors tracked.
        k: usize,
    },
    /// Hidden-candidate outlier (HODC/HKODC): tracks `k + n - 1` neighbors so that,
    /// after a top outlier is reported and its shared neighbors are discounted, there
    /// are still enough usable neighbors left to recompute a score.
    Hodc {
        /// Number of neighbors a score is computed from.
        k: usize,
        /// Size of the Top-N list this definition will be deflated against.
        n: usize,
    },
}

impl OutlierKind {
    /// The `k` every variant shares.
    #[must_use]
    pub fn k(&self) -> usize {
        match self {
            Self::Kth { k } | Self::Knn { k } | Self::Hodc { k, .. } => *k,
        }
    }

    /// The kNN queue's capacity: `k` for the plain variants, `k + n - 1` for HODC.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        match self {
            Self::Kth { k } | Self::Knn { k } => *k,
            Self::Hodc { k, n } => k + n - 1,
        }
    }

    /// Whether this is a hidden-candidate (HODC/HKODC) variant.
    #[must_use]
    pub fn is_hodc(&self) -> bool {
        matches!(self, Self::Hodc { .. })
    }

    /// Allocates a fresh, all-sentinel [`OutlierState`] for one object.
    #[must_use]
    pub fn new_state(self) -> OutlierState {
        OutlierState::new(self)
    }
}

/// The per-object running state the block sweep maintains: its kNN queue, whether it is
/// still a live candidate, and its cached weight(s).
#[derive(Debug, Clone)]
pub struct OutlierState {
    kind: OutlierKind,
    knn: KFarthestQueue,
    active: bool,
    weight: f64,
    nk_weight: f64,
    /// `Some` only for [`OutlierKind::Hodc`]: one flag per kNN slot, true while that
    /// neighbor is still usable (has not itself been reported as a prior top outlier).
    neighbor_flag: Option<Vec<bool>>,
}

impl OutlierState {
    fn new(kind: OutlierKind) -> Self {
        let cap = kind.queue_capacity();
        Self {
            kind,
            knn: KFarthestQueue::new(cap),
            active: true,
            weight: f64::INFINITY,
            nk_weight: f64::INFINITY,
            neighbor_flag: kind.is_hodc().then(|| vec![true; cap]),
        }
    }

    /// The definition this state was created from.
    #[must_use]
    pub fn kind(&self) -> OutlierKind {
        self.kind
    }

    /// The object's kNN queue.
    #[must_use]
    pub fn knn(&self) -> &KFarthestQueue {
        &self.knn
    }

    /// Whether the object can still become (or remain) a Top-N outlier.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Marks the object dead: no further metric calls will target it.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The cached weight: the usable k-nearest-neighbor sum (the k-th distance for
    /// `Kth`). Used to rank against the Top-N queue and, for HODC, recomputed during
    /// deflation as `neighbor_flag` changes.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The cached NK-weight (HODC variants only; equal to `weight` otherwise): the sum
    /// of the n-th..(n+k-1)-th nearest neighbors, i.e. the k *farthest* of the `k+n-1`
    /// tracked. Used to decide deactivation and hidden-candidate admission/ordering.
    #[must_use]
    pub fn nk_weight(&self) -> f64 {
        self.nk_weight
    }

    /// The number of real (non-sentinel) neighbors currently held.
    #[must_use]
    pub fn neighbor_num(&self) -> usize {
        self.knn.entries().iter().filter(|e| e.is_real()).count()
    }

    /// Recomputes `weight`: the head distance for `Kth`, the sum of the k nearest for
    /// `Knn`, and for `Hodc` the sum of the k nearest *usable* neighbors (see
    /// [`Self::set_neighbor_flag`]) — the standard k-nearest sum that ranks Top-N.
    fn set_weight(&mut self) {
        self.weight = match self.kind {
            OutlierKind::Kth { .. } => self.knn.head().dis,
            OutlierKind::Knn { k } => self.knn.entries()[..k].iter().map(|e| e.dis).sum(),
            OutlierKind::Hodc { k, .. } => {
                let flags = self.neighbor_flag.as_ref().expect("hodc state carries flags");
                let entries = self.knn.entries();
                let mut sum = 0.0;
                let mut used = 0;
                // Entries are sorted descending by distance, so the nearest neighbor sits
                // at the tail; walk from the tail inward to prefer nearer usable
                // neighbors first.
                for idx in (0..entries.len()).rev() {
                    if flags[idx] {
                        sum += entries[idx].dis;
                        used += 1;
                        if used == k {
                            break;
                        }
                    }
                }
                if used < k { f64::INFINITY } else { sum }
            }
        };
    }

    /// Recomputes `nk_weight`. For the plain variants this mirrors `weight`; for HODC it
    /// is the sum of the n-th..(n+k-1)-th nearest neighbors — the k farthest of the
    /// `k+n-1` tracked (`entries[..k]`), independent of `neighbor_flag`.
    fn set_nk_weight(&mut self) {
        let k = self.kind.k();
        self.nk_weight = match self.kind {
            OutlierKind::Kth { .. } | OutlierKind::Knn { .. } => self.weight,
            OutlierKind::Hodc { .. } => self.knn.entries()[..k].iter().map(|e| e.dis).sum(),
        };
    }

    /// Flips false the flag of any neighbor slot whose `data_id` equals `reported_id`.
    ///
    /// Called once per newly-finalized Top-N entry during HOD post-processing (§4.6
    /// step 3), so that an object which only looked like an outlier because it shared a
    /// neighbor with an already-reported outlier loses that support.
    pub fn set_neighbor_flag(&mut self, reported_id: usize) {
        let Some(flags) = self.neighbor_flag.as_mut() else { return };
        let reported_id = i64::try_from(reported_id).unwrap_or(i64::MAX);
        for (idx, e) in self.knn.entries().iter().enumerate() {
            if e.data_id == reported_id {
                flags[idx] = false;
            }
        }
    }

    /// Attempts to insert a newly-measured neighbor. Returns whether it was accepted.
    ///
    /// On acceptance, refreshes `weight`/`nk_weight` and deactivates the object if its
    /// gating weight (`nk_weight` for HODC — the farthest-of-window sum — or `weight`
    /// otherwise) has fallen below the current cutoff `c`.
    pub fn try_insert_neighbor(&mut self, neighbor: usize, dis: f64, cutoff: f64) -> bool {
        if !self.knn.try_insert(KnnEntry::new(neighbor, dis)) {
            return false;
        }
        self.set_weight();
        self.set_nk_weight();
        let gate = if self.kind.is_hodc() { self.nk_weight } else { self.weight };
        if gate < cutoff {
            self.active = false;
        }
        true
    }
}

/// A by-value snapshot of a finalized object's kNN state, retained so the HOD
/// post-processing pass (§4.6 step 3) can deflate candidates without touching the live
/// [`OutlierState`] array.
#[derive(Debug, Clone)]
pub struct HiddenCandidate {
    /// The object this snapshot belongs to.
    pub data_id: usize,
    /// Neighbor count used to recompute a deflated score.
    k: usize,
    /// A snapshot of the kNN queue at insertion time.
    knn_snapshot: Vec<KnnEntry>,
    /// Per-slot usability flags, independent of the live state's flags.
    neighbor_flag: Vec<bool>,
    /// The usable k-nearest sum, refreshed during deflation as `neighbor_flag` changes.
    /// This, not `nk_weight`, is what deflation compares candidates by.
    weight: f64,
    /// The candidate's NK-weight at snapshot time (farthest-of-window sum). Fixed for
    /// the candidate's lifetime: it does not depend on `neighbor_flag`, so it is used
    /// only for admission and for keeping [`HiddenCandidateSet`] ordered.
    pub nk_weight: f64,
    /// Whether this candidate is still eligible to be picked for the Top-N list.
    pub top_n_flag: bool,
}

impl HiddenCandidate {
    /// Snapshots `state` (which must be a HODC state) as a hidden candidate.
    #[must_use]
    pub fn snapshot(data_id: usize, state: &OutlierState) -> Self {
        Self {
            data_id,
            k: state.kind.k(),
            knn_snapshot: state.knn.entries().to_vec(),
            neighbor_flag: state.neighbor_flag.clone().unwrap_or_default(),
            weight: state.weight,
            nk_weight: state.nk_weight,
            top_n_flag: true,
        }
    }

    /// Flips false the flag of any snapshot slot whose `data_id` equals `reported_id`.
    pub fn set_neighbor_flag(&mut self, reported_id: usize) {
        let reported_id = i64::try_from(reported_id).unwrap_or(i64::MAX);
        for (idx, e) in self.knn_snapshot.iter().enumerate() {
            if e.data_id == reported_id {
                self.neighbor_flag[idx] = false;
            }
        }
    }

    /// Recomputes and stores `weight` from the current flags (the usable k-nearest
    /// sum), returning the new value.
    pub fn recompute_weight(&mut self) -> f64 {
        let mut sum = 0.0;
        let mut used = 0;
        for idx in (0..self.knn_snapshot.len()).rev() {
            if self.neighbor_flag[idx] {
                sum += self.knn_snapshot[idx].dis;
                used += 1;
                if used == self.k {
                    break;
                }
            }
        }
        self.weight = if used < self.k { f64::INFINITY } else { sum };
        self.weight
    }
}

/// The hidden-candidate pool maintained during HOD/iHOD sweeps: objects not (yet) in the
/// Top-N list but whose expanded neighbor window holds enough margin that they may
/// displace a Top-N entry once mutual-neighbor deflation runs.
#[derive(Debug, Clone, Default)]
pub struct HiddenCandidateSet {
    candidates: Vec<HiddenCandidate>,
}

impl HiddenCandidateSet {
    /// An empty candidate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a candidate, keeping the set sorted descending by `nk_weight`.
    pub fn push(&mut self, candidate: HiddenCandidate) {
        let pos = self
            .candidates
            .partition_point(|c| c.nk_weight > candidate.nk_weight);
        self.candidates.insert(pos, candidate);
    }

    /// Drops every candidate whose `nk_weight` has fallen below `cutoff`.
    pub fn truncate_below(&mut self, cutoff: f64) {
        self.candidates.retain(|c| c.nk_weight >= cutoff);
    }

    /// The number of retained candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Runs the mutual-neighbor deflation pass of §4.6 step 3 against an already-decided
    /// descending Top-N list, replacing every slot after the first with the best
    /// surviving candidate once earlier slots' neighbor support has been discounted.
    #[must_use]
    pub fn deflate(mut self, mut top_n: Vec<(usize, f64)>) -> Vec<(usize, f64)> {
        if top_n.is_empty() {
            return top_n;
        }
        let first_id = top_n[0].0;
        for c in &mut self.candidates {
            if c.data_id == first_id {
                c.top_n_flag = false;
            }
        }
        for i in 1..top_n.len() {
            let prev_id = top_n[i - 1].0;
            for c in &mut self.candidates {
                c.set_neighbor_flag(prev_id);
            }
            let mut best: Option<(usize, usize, f64)> = None;
            for (idx, c) in self.candidates.iter_mut().enumerate() {
                if !c.top_n_flag {
                    continue;
                }
                let w = c.recompute_weight();
                let better = match best {
                    Some((_, _, best_w)) => w > best_w,
                    None => true,
                };
                if better {
                    best = Some((idx, c.data_id, w));
                }
            }
            if let Some((idx, id, w)) = best {
                top_n[i] = (id, w);
                self.candidates[idx].top_n_flag = false;
            }
        }
        top_n
    }
}
