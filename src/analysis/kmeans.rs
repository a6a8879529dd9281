//! Centroid-based clustering of standardized feature vectors.
//!
//! Plain Lloyd's iteration with seeded random initialization. Several
//! restarts run in parallel, each on its own centroid state, and only
//! the lowest-inertia result is kept; ties go to the lowest restart
//! index so the outcome never depends on thread scheduling.

use crate::features::{FeatureVector, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

/// Iteration cap per restart.
pub const MAX_ITERATIONS: usize = 300;

/// Number of random initializations to try.
pub const DEFAULT_RESTARTS: usize = 10;

/// Outcome of a clustering run.
#[derive(Clone, Debug)]
pub struct KMeansResult {
    /// Cluster id per input row, each in `[0, k)`.
    pub assignments: Vec<usize>,
    /// Mean vector of each cluster, in the input (standardized) space.
    pub centroids: Vec<FeatureVector>,
    /// Sum of squared distances of rows to their assigned centroid.
    pub inertia: f64,
}

/// Squared Euclidean distance between two feature vectors.
pub fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

fn nearest_centroid(point: &FeatureVector, centroids: &[FeatureVector]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

/// One seeded Lloyd's run: initialize centroids from k distinct random
/// points, then alternate assignment and mean updates until assignments
/// stop changing or the iteration cap is hit.
fn run_single(points: &[FeatureVector], k: usize, seed: u64) -> KMeansResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.shuffle(&mut rng);
    let mut centroids: Vec<FeatureVector> = indices[..k].iter().map(|&i| points[i]).collect();

    let mut assignments = vec![0usize; points.len()];
    for iteration in 0..MAX_ITERATIONS {
        let mut changed = iteration == 0;
        for (i, point) in points.iter().enumerate() {
            let best = nearest_centroid(point, &centroids);
            if best != assignments[i] {
                assignments[i] = best;
                changed = true;
            }
        }

        let mut counts = vec![0usize; k];
        for &cluster in &assignments {
            counts[cluster] += 1;
        }

        // An emptied cluster is reseeded with the point farthest from its
        // current centroid, stolen from a cluster that keeps at least one
        // member. Keeps every cluster non-empty, deterministically.
        for cluster in 0..k {
            if counts[cluster] > 0 {
                continue;
            }
            let mut victim = None;
            let mut victim_dist = -1.0;
            for (i, point) in points.iter().enumerate() {
                if counts[assignments[i]] < 2 {
                    continue;
                }
                let dist = squared_distance(point, &centroids[assignments[i]]);
                if dist > victim_dist {
                    victim = Some(i);
                    victim_dist = dist;
                }
            }
            if let Some(i) = victim {
                counts[assignments[i]] -= 1;
                assignments[i] = cluster;
                counts[cluster] += 1;
                changed = true;
            }
        }

        let mut sums = vec![[0.0; FEATURE_COUNT]; k];
        for (point, &cluster) in points.iter().zip(assignments.iter()) {
            for (col, value) in point.iter().enumerate() {
                sums[cluster][col] += value;
            }
        }
        for cluster in 0..k {
            if counts[cluster] > 0 {
                for col in 0..FEATURE_COUNT {
                    centroids[cluster][col] = sums[cluster][col] / counts[cluster] as f64;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(assignments.iter())
        .map(|(point, &cluster)| squared_distance(point, &centroids[cluster]))
        .sum();

    KMeansResult {
        assignments,
        centroids,
        inertia,
    }
}

/// Partition `points` into `k` clusters.
///
/// Precondition (enforced by the caller): `1 <= k <= points.len()`.
/// The seed makes the whole computation reproducible; each restart
/// derives its own seed from it.
pub fn kmeans(points: &[FeatureVector], k: usize, restarts: usize, seed: u64) -> KMeansResult {
    debug_assert!(k >= 1);
    debug_assert!(k <= points.len());

    let best = (0..restarts.max(1))
        .into_par_iter()
        .map(|run| (run, run_single(points, k, seed.wrapping_add(run as u64))))
        .min_by(|(run_a, a), (run_b, b)| {
            a.inertia
                .partial_cmp(&b.inertia)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(run_a.cmp(run_b))
        })
        .map(|(_, result)| result)
        .expect("at least one restart runs");

    debug!(
        "K-means: k={}, {} points, {} restarts, best inertia {:.4}.",
        k,
        points.len(),
        restarts.max(1),
        best.inertia
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_point(value: f64) -> FeatureVector {
        [value; FEATURE_COUNT]
    }

    fn make_two_blobs() -> Vec<FeatureVector> {
        vec![
            make_point(0.0),
            make_point(0.1),
            make_point(-0.1),
            make_point(10.0),
            make_point(10.1),
            make_point(9.9),
        ]
    }

    #[test]
    fn test_recovers_well_separated_blobs() {
        let points = make_two_blobs();
        let result = kmeans(&points, 2, DEFAULT_RESTARTS, 42);
        assert_eq!(result.assignments.len(), 6);
        let first = result.assignments[0];
        let second = result.assignments[3];
        assert_ne!(first, second);
        assert_eq!(&result.assignments[..3], &[first, first, first]);
        assert_eq!(&result.assignments[3..], &[second, second, second]);
    }

    #[test]
    fn test_every_cluster_has_a_member() {
        let points = make_two_blobs();
        for k in 1..=points.len() {
            let result = kmeans(&points, k, 4, 7);
            let mut counts = vec![0usize; k];
            for &cluster in &result.assignments {
                assert!(cluster < k);
                counts[cluster] += 1;
            }
            assert!(counts.iter().all(|&c| c > 0), "empty cluster with k={}", k);
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let points = make_two_blobs();
        let a = kmeans(&points, 3, DEFAULT_RESTARTS, 42);
        let b = kmeans(&points, 3, DEFAULT_RESTARTS, 42);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_k_equals_point_count_gives_zero_inertia() {
        let points = vec![make_point(1.0), make_point(2.0), make_point(3.0)];
        let result = kmeans(&points, 3, DEFAULT_RESTARTS, 42);
        assert!(result.inertia < 1e-12);
    }

    #[test]
    fn test_centroids_are_member_means() {
        let points = make_two_blobs();
        let result = kmeans(&points, 2, DEFAULT_RESTARTS, 42);
        for cluster in 0..2 {
            let members: Vec<&FeatureVector> = points
                .iter()
                .zip(result.assignments.iter())
                .filter(|(_, &c)| c == cluster)
                .map(|(p, _)| p)
                .collect();
            let mean = members.iter().map(|p| p[0]).sum::<f64>() / members.len() as f64;
            assert!((result.centroids[cluster][0] - mean).abs() < 1e-9);
        }
    }
}
