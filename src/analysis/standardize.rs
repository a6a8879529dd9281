//! Playlist-local feature standardization.
//!
//! Scaling is computed over the matched tracks of the current playlist
//! only, never against the full catalog, so the same track can land in a
//! different position depending on what else is in the playlist.

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::linker::LinkedTrack;

/// Floor added to the per-column standard deviation so a zero-variance
/// feature scales to a constant column instead of dividing by zero.
pub const STD_EPSILON: f64 = 1e-9;

/// Extract the raw feature matrix from linked tracks, imputing any
/// non-finite value to zero. Post-linking every value should already be
/// finite; the imputation only guards the degenerate case.
pub fn feature_matrix(tracks: &[LinkedTrack]) -> Vec<FeatureVector> {
    tracks
        .iter()
        .map(|track| {
            let mut row = track.features;
            for value in row.iter_mut() {
                if !value.is_finite() {
                    *value = 0.0;
                }
            }
            row
        })
        .collect()
}

/// Per-column mean of a feature matrix.
pub fn column_means(matrix: &[FeatureVector]) -> FeatureVector {
    let mut means = [0.0; FEATURE_COUNT];
    if matrix.is_empty() {
        return means;
    }
    for row in matrix {
        for (col, value) in row.iter().enumerate() {
            means[col] += value;
        }
    }
    for mean in means.iter_mut() {
        *mean /= matrix.len() as f64;
    }
    means
}

/// Z-score each column to zero mean and unit variance (population
/// variance, matching the scaling the clustering was tuned against).
pub fn standardize(matrix: &[FeatureVector]) -> Vec<FeatureVector> {
    if matrix.is_empty() {
        return Vec::new();
    }

    let means = column_means(matrix);
    let mut stds = [0.0; FEATURE_COUNT];
    for row in matrix {
        for (col, value) in row.iter().enumerate() {
            stds[col] += (value - means[col]).powi(2);
        }
    }
    for std in stds.iter_mut() {
        *std = (*std / matrix.len() as f64).sqrt();
    }

    matrix
        .iter()
        .map(|row| {
            let mut scaled = [0.0; FEATURE_COUNT];
            for col in 0..FEATURE_COUNT {
                scaled[col] = (row[col] - means[col]) / (stds[col] + STD_EPSILON);
            }
            scaled
        })
        .collect()
}
