//! Literal end-to-end scenarios: each one seeds a small, hand-built dataset and checks
//! the detector's output against either an exact expected value or a brute-force
//! reference (for configurations where a tie makes the exact expectation
//! implementation-defined).

mod common;

use common::{brute_force_top_n, store_from};
use orca_outliers::config::DetectionConfig;
use orca_outliers::detector::BlockSweepDetector;
use orca_outliers::outlier::OutlierKind;
use orca_outliers::pivot::PivotStrategyKind;
use orca_outliers::store::ObjectSource;

fn rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(0)
}

/// S1: a unit square plus one far outlier. No ties, so the exact winner and weight are
/// asserted directly against the hand-computed 2nd-nearest-neighbor distance.
#[test]
fn s1_unit_square_with_far_outlier_kth() {
    let store = store_from(&[
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![10.0, 10.0],
    ]);
    let config = DetectionConfig {
        n: 1,
        block_size: 3,
        outlier: OutlierKind::Kth { k: 2 },
        pivot: PivotStrategyKind::Fft { num_pivots: 1, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert_eq!(report.valid, 1);
    assert_eq!(report.top_n.len(), 1);
    assert_eq!(report.top_n[0].0, 4);
    // nearest neighbor of (10, 10) is (1, 1) at sqrt(162); 2nd-nearest is (1, 0) or
    // (0, 1), both at sqrt(181), which is the weight a k=2 KthOutlier reports.
    assert!((report.top_n[0].1 - 181.0_f64.sqrt()).abs() < 1e-6);

    let brute = brute_force_top_n(&store, 2, 1, false);
    assert_eq!(report.top_n, brute);
}

/// S2: a line with one far outlier, `KnnOutlier` with `k = 1` (equivalent to nearest-
/// neighbor distance). Four points tie at weight 1, so only the outlier's slot is
/// asserted exactly; the tied runner-up is checked against the brute-force set.
#[test]
fn s2_line_with_far_outlier_knn() {
    let store = store_from(&[vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![100.0]]);
    let config = DetectionConfig {
        n: 2,
        block_size: 2,
        outlier: OutlierKind::Knn { k: 1 },
        pivot: PivotStrategyKind::Fft { num_pivots: 1, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert_eq!(report.valid, 2);
    assert_eq!(report.top_n[0], (4, 97.0));
    assert!((report.top_n[1].1 - 1.0).abs() < 1e-9);
    assert!(report.top_n[1].0 <= 3);

    let brute = brute_force_top_n(&store, 1, 2, true);
    assert_eq!(report.top_n[0], brute[0]);
}

fn line_cluster(origin: f64, spacing: f64, count: usize, y: f64) -> Vec<Vec<f64>> {
    (0..count).map(|i| vec![origin + spacing * i as f64, y]).collect()
}

/// S3/S4: two tight line clusters plus one far outlier. Exactness against brute force
/// is checked directly rather than hand-deriving every cluster member's kth distance;
/// this also subsumes the "boundary point" nuance the narrative spec describes,
/// whichever points they turn out to be.
fn two_clusters_and_outlier() -> (Vec<Vec<f64>>, usize) {
    let mut points = line_cluster(0.0, 0.1, 10, 0.0);
    points.extend(line_cluster(10.0, 0.1, 10, 10.0));
    let outlier_id = points.len();
    points.push(vec![100.0, 100.0]);
    (points, outlier_id)
}

#[test]
fn s3_two_clusters_single_outlier_kth() {
    let (points, outlier_id) = two_clusters_and_outlier();
    let store = store_from(&points);
    let config = DetectionConfig {
        n: 1,
        block_size: 5,
        outlier: OutlierKind::Kth { k: 3 },
        pivot: PivotStrategyKind::Fft { num_pivots: 2, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert_eq!(report.top_n[0].0, outlier_id);
    assert!(report.top_n[0].1 > 100.0);

    let brute = brute_force_top_n(&store, 3, 1, false);
    assert_eq!(report.top_n, brute);
}

#[test]
fn s4_two_clusters_top_three_kth() {
    let (points, outlier_id) = two_clusters_and_outlier();
    let store = store_from(&points);
    let config = DetectionConfig {
        n: 3,
        block_size: 5,
        outlier: OutlierKind::Kth { k: 3 },
        pivot: PivotStrategyKind::Fft { num_pivots: 2, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert_eq!(report.top_n[0].0, outlier_id);
    let brute = brute_force_top_n(&store, 3, 3, false);
    let mut detected = report.top_n.clone();
    detected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    assert_eq!(detected.len(), brute.len());
    for (got, want) in detected.iter().zip(&brute) {
        assert!((got.1 - want.1).abs() < 1e-9, "{got:?} vs {want:?}");
    }
}

/// S5: identical points score weight 0 everywhere, and the strict `>` acceptance rule
/// means nothing is ever accepted into a queue seeded at cutoff 0 -- a well-defined,
/// documented `valid == 0` outcome rather than an arbitrary tie-break.
#[test]
fn s5_identical_points_never_fill_top_n() {
    let store = store_from(&vec![vec![0.0, 0.0]; 5]);
    let config = DetectionConfig {
        n: 1,
        block_size: 5,
        outlier: OutlierKind::Kth { k: 1 },
        pivot: PivotStrategyKind::Fft { num_pivots: 1, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert_eq!(report.valid, 0);
    assert!(report.top_n.is_empty());
    assert!((report.cutoff).abs() < 1e-12);
}

/// S6: two mutually-nearest pathological points isolated from a normal cluster. This
/// is a smoke test for the HODC code path end-to-end (the precise numeric deflation
/// behavior is covered directly by `outlier::tests` and `properties.rs`): it checks
/// the run completes, respects its shape contract, and exercises a case with more
/// than one hidden candidate.
#[test]
fn s6_hodc_runs_to_completion_on_mutual_neighbor_pair() {
    let mut points = line_cluster(0.0, 0.3, 8, 0.0);
    points.push(vec![40.0, 40.0]);
    points.push(vec![40.0, 41.0]);
    let store = store_from(&points);
    let config = DetectionConfig {
        n: 2,
        block_size: 4,
        outlier: OutlierKind::Hodc { k: 3, n: 2 },
        pivot: PivotStrategyKind::Fft { num_pivots: 2, first_pivot_hint: 0 },
    };
    let detector = BlockSweepDetector::new(&store, config, &mut rng()).unwrap();
    let report = detector.detect().unwrap();

    assert!(report.valid <= 2);
    assert!(report.top_n.len() == report.valid);
    for &(id, weight) in &report.top_n {
        assert!(id < store.len());
        assert!(weight.is_finite());
        assert!(weight >= 0.0);
    }
}
