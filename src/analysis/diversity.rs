//! Diversity metrics over the final vibe assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How concentrated or spread out a playlist's vibes are.
///
/// `dominant_share` is the fraction of tracks in the most common vibe;
/// `shannon` is the entropy of the vibe distribution normalized by the
/// log of the number of distinct vibes present, so both live in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiversityMetrics {
    pub dominant_share: f64,
    pub shannon: f64,
}

/// Compute diversity metrics over the assigned vibes.
///
/// With a single distinct vibe the normalized entropy is defined as
/// zero; dividing by log2(1) would yield NaN otherwise. An empty input
/// yields all-zero metrics.
pub fn vibe_diversity<S: AsRef<str>>(vibes: &[S]) -> DiversityMetrics {
    if vibes.is_empty() {
        return DiversityMetrics {
            dominant_share: 0.0,
            shannon: 0.0,
        };
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for vibe in vibes {
        *counts.entry(vibe.as_ref()).or_insert(0) += 1;
    }

    let total = vibes.len() as f64;
    let dominant_share = counts
        .values()
        .map(|&count| count as f64 / total)
        .fold(0.0, f64::max);

    let shannon = if counts.len() < 2 {
        0.0
    } else {
        let entropy: f64 = counts
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum();
        entropy / (counts.len() as f64).log2()
    };

    DiversityMetrics {
        dominant_share,
        shannon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let metrics = vibe_diversity::<&str>(&[]);
        assert_eq!(metrics.dominant_share, 0.0);
        assert_eq!(metrics.shannon, 0.0);
    }

    #[test]
    fn test_single_vibe_has_zero_entropy() {
        let metrics = vibe_diversity(&["Party / Upbeat"; 5]);
        assert_eq!(metrics.dominant_share, 1.0);
        assert_eq!(metrics.shannon, 0.0);
    }

    #[test]
    fn test_uniform_distribution_has_full_entropy() {
        let vibes = ["A", "A", "B", "B", "C", "C"];
        let metrics = vibe_diversity(&vibes);
        assert!((metrics.dominant_share - 1.0 / 3.0).abs() < 1e-9);
        assert!((metrics.shannon - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_skewed_distribution() {
        let vibes = ["A", "A", "A", "B"];
        let metrics = vibe_diversity(&vibes);
        assert!((metrics.dominant_share - 0.75).abs() < 1e-9);
        assert!(metrics.shannon > 0.0 && metrics.shannon < 1.0);
    }

    #[test]
    fn test_metrics_stay_in_unit_interval() {
        let vibes = ["A", "B", "B", "C", "C", "C", "D"];
        let metrics = vibe_diversity(&vibes);
        assert!((0.0..=1.0).contains(&metrics.dominant_share));
        assert!((0.0..=1.0).contains(&metrics.shannon));
    }
}
