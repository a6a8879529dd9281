//! Representative track selection for explainability.
//!
//! For each cluster, the tracks whose standardized vectors sit closest
//! to the cluster centroid are its most prototypical examples.

use super::AnalyzedTrack;
use crate::analysis::kmeans::squared_distance;
use crate::features::FeatureVector;
use serde::Serialize;

/// Default number of representatives per cluster.
pub const DEFAULT_REPRESENTATIVES: usize = 5;

/// One representative track, ranked within its cluster.
#[derive(Clone, Debug, Serialize)]
pub struct RepresentativeTrack {
    /// 1-based rank by ascending centroid distance.
    pub rank: usize,
    pub name: String,
    pub artists: String,
    pub features: FeatureVector,
    /// Euclidean distance to the cluster centroid in standardized space.
    pub distance: f64,
}

/// The representatives of one (cluster, vibe) pair.
#[derive(Clone, Debug, Serialize)]
pub struct ClusterRepresentatives {
    pub cluster: usize,
    pub vibe: String,
    pub tracks: Vec<RepresentativeTrack>,
}

/// Select up to `k` representatives per cluster, ordered by ascending
/// distance to the cluster's standardized centroid. Distance ties keep
/// the original track order (the sort is stable).
pub fn select_representatives(
    tracks: &[AnalyzedTrack],
    standardized: &[FeatureVector],
    centroids: &[FeatureVector],
    k: usize,
) -> Vec<ClusterRepresentatives> {
    debug_assert_eq!(tracks.len(), standardized.len());

    let mut result = Vec::with_capacity(centroids.len());
    for (cluster, centroid) in centroids.iter().enumerate() {
        let mut members: Vec<(usize, f64)> = tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| track.cluster == cluster)
            .map(|(idx, _)| (idx, squared_distance(&standardized[idx], centroid).sqrt()))
            .collect();
        members.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        members.truncate(k);

        let vibe = members
            .first()
            .map(|&(idx, _)| tracks[idx].vibe.clone())
            .unwrap_or_default();

        let ranked = members
            .into_iter()
            .enumerate()
            .map(|(pos, (idx, distance))| RepresentativeTrack {
                rank: pos + 1,
                name: tracks[idx].name.clone(),
                artists: tracks[idx].artists.clone(),
                features: tracks[idx].features,
                distance,
            })
            .collect();

        result.push(ClusterRepresentatives {
            cluster,
            vibe,
            tracks: ranked,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;
    use crate::linker::MatchStage;

    fn make_track(name: &str, cluster: usize) -> AnalyzedTrack {
        AnalyzedTrack {
            id: None,
            name: name.to_string(),
            artists: "a".to_string(),
            features: [0.0; FEATURE_COUNT],
            cluster,
            vibe: "Party / Upbeat".to_string(),
            stage: MatchStage::ExactId,
        }
    }

    fn make_point(value: f64) -> FeatureVector {
        let mut point = [0.0; FEATURE_COUNT];
        point[0] = value;
        point
    }

    #[test]
    fn test_orders_by_ascending_distance_with_ranks() {
        let tracks = vec![
            make_track("far", 0),
            make_track("near", 0),
            make_track("mid", 0),
        ];
        let standardized = vec![make_point(3.0), make_point(0.5), make_point(1.5)];
        let centroids = vec![make_point(0.0)];
        let reps = select_representatives(&tracks, &standardized, &centroids, 5);
        assert_eq!(reps.len(), 1);
        let names: Vec<&str> = reps[0].tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        let ranks: Vec<usize> = reps[0].tracks.iter().map(|t| t.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        for pair in reps[0].tracks.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_never_exceeds_cluster_size_or_k() {
        let tracks = vec![make_track("a", 0), make_track("b", 0), make_track("c", 1)];
        let standardized = vec![make_point(0.0), make_point(1.0), make_point(5.0)];
        let centroids = vec![make_point(0.0), make_point(5.0)];
        let reps = select_representatives(&tracks, &standardized, &centroids, 2);
        assert_eq!(reps[0].tracks.len(), 2);
        assert_eq!(reps[1].tracks.len(), 1);
        let reps = select_representatives(&tracks, &standardized, &centroids, 1);
        assert_eq!(reps[0].tracks.len(), 1);
    }

    #[test]
    fn test_distance_ties_keep_original_order() {
        let tracks = vec![
            make_track("first", 0),
            make_track("second", 0),
            make_track("third", 0),
        ];
        // Equidistant from the centroid on both sides.
        let standardized = vec![make_point(1.0), make_point(-1.0), make_point(1.0)];
        let centroids = vec![make_point(0.0)];
        let reps = select_representatives(&tracks, &standardized, &centroids, 3);
        let names: Vec<&str> = reps[0].tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_carries_cluster_vibe() {
        let mut tracks = vec![make_track("a", 0), make_track("b", 1)];
        tracks[1].vibe = "Chill / Acoustic".to_string();
        let standardized = vec![make_point(0.0), make_point(5.0)];
        let centroids = vec![make_point(0.0), make_point(5.0)];
        let reps = select_representatives(&tracks, &standardized, &centroids, 5);
        assert_eq!(reps[0].vibe, "Party / Upbeat");
        assert_eq!(reps[1].vibe, "Chill / Acoustic");
    }
}
