//! The playlist analysis pipeline.
//!
//! One synchronous batch computation per request: link the playlist to
//! the catalog, standardize the matched tracks' features, cluster them,
//! label each cluster centroid with a vibe, and expose the pieces the
//! reporting helpers need. Nothing here is cached or shared across
//! requests; all working data lives on the request's call stack.

pub mod diversity;
pub mod kmeans;
pub mod representatives;
pub mod standardize;
pub mod vibes;

use crate::catalog::Catalog;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::linker::{link_playlist, MatchStage, PlaylistTrack};
use self::diversity::{vibe_diversity, DiversityMetrics};
use self::kmeans::{kmeans, DEFAULT_RESTARTS};
use self::representatives::{select_representatives, ClusterRepresentatives};
use self::vibes::VibeBank;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// Default number of clusters when the user expresses no preference.
pub const DEFAULT_CLUSTERS: usize = 4;

/// Default clustering seed, for callers that only care that results are
/// reproducible, not which seed produced them.
pub const DEFAULT_SEED: u64 = 42;

/// Why an analysis request could not produce a result.
///
/// Both variants are detected up front, before any clustering work, and
/// are recoverable at the caller (surface a message, adjust the
/// request); neither is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// No playlist track could be resolved against the catalog, by id
    /// or by title/artist.
    #[error("no playlist track could be matched against the catalog")]
    LinkageFailure,
    /// Fewer tracks matched than clusters were requested.
    #[error(
        "{matched} matched tracks cannot fill {requested} clusters; at most {max_feasible} are feasible"
    )]
    InsufficientMatches {
        requested: usize,
        matched: usize,
        max_feasible: usize,
    },
}

/// A linked track with its final cluster and vibe assignment. Created
/// once per run, never mutated afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct AnalyzedTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: String,
    /// Raw (unstandardized) feature values.
    pub features: FeatureVector,
    pub cluster: usize,
    pub vibe: String,
    /// Which linkage stage resolved this track.
    pub stage: MatchStage,
}

/// Track count and mean raw features of one vibe in the result.
#[derive(Clone, Debug, Serialize)]
pub struct VibeSummary {
    pub vibe: String,
    pub track_count: usize,
    pub feature_means: FeatureVector,
}

/// Everything one analysis run produces.
#[derive(Clone, Debug, Serialize)]
pub struct PlaylistAnalysis {
    /// Matched tracks in playlist order, with cluster and vibe.
    pub tracks: Vec<AnalyzedTrack>,
    /// Mean raw feature values over the matched tracks.
    pub feature_means: FeatureVector,
    /// The standardized feature matrix, row-aligned with `tracks`.
    pub standardized: Vec<FeatureVector>,
    /// Cluster id per row, same order as `tracks`.
    pub cluster_ids: Vec<usize>,
    /// Standardized-space centroid per cluster.
    pub centroids: Vec<FeatureVector>,
}

impl PlaylistAnalysis {
    /// Diversity metrics over the final vibe assignment.
    pub fn diversity(&self) -> DiversityMetrics {
        let vibes: Vec<&str> = self.tracks.iter().map(|t| t.vibe.as_str()).collect();
        vibe_diversity(&vibes)
    }

    /// Up to `k` most prototypical tracks per cluster.
    pub fn representatives(&self, k: usize) -> Vec<ClusterRepresentatives> {
        select_representatives(&self.tracks, &self.standardized, &self.centroids, k)
    }

    /// Per-vibe track counts and mean raw features, ordered by vibe name.
    pub fn vibe_summaries(&self) -> Vec<VibeSummary> {
        let mut groups: BTreeMap<&str, Vec<&AnalyzedTrack>> = BTreeMap::new();
        for track in &self.tracks {
            groups.entry(track.vibe.as_str()).or_default().push(track);
        }
        groups
            .into_iter()
            .map(|(vibe, members)| {
                let mut means = [0.0; FEATURE_COUNT];
                for track in &members {
                    for (col, value) in track.features.iter().enumerate() {
                        means[col] += value;
                    }
                }
                for mean in means.iter_mut() {
                    *mean /= members.len() as f64;
                }
                VibeSummary {
                    vibe: vibe.to_string(),
                    track_count: members.len(),
                    feature_means: means,
                }
            })
            .collect()
    }

    /// Distinct vibes present, in name order.
    pub fn distinct_vibes(&self) -> Vec<&str> {
        let mut vibes: Vec<&str> = self.tracks.iter().map(|t| t.vibe.as_str()).collect();
        vibes.sort_unstable();
        vibes.dedup();
        vibes
    }
}

/// Run the full pipeline with the built-in vibe bank.
pub fn analyze(
    playlist: &[PlaylistTrack],
    catalog: &Catalog,
    n_clusters: usize,
    seed: u64,
) -> Result<PlaylistAnalysis, AnalysisError> {
    analyze_with_bank(playlist, catalog, n_clusters, seed, VibeBank::builtin())
}

/// Run the full pipeline against a specific vibe bank.
pub fn analyze_with_bank(
    playlist: &[PlaylistTrack],
    catalog: &Catalog,
    n_clusters: usize,
    seed: u64,
    bank: &VibeBank,
) -> Result<PlaylistAnalysis, AnalysisError> {
    debug_assert!(n_clusters >= 1);

    let linked = link_playlist(playlist, catalog);
    if linked.is_empty() {
        return Err(AnalysisError::LinkageFailure);
    }
    if linked.len() < n_clusters {
        return Err(AnalysisError::InsufficientMatches {
            requested: n_clusters,
            matched: linked.len(),
            max_feasible: linked.len().max(1),
        });
    }

    let raw = standardize::feature_matrix(&linked);
    let feature_means = standardize::column_means(&raw);
    let standardized = standardize::standardize(&raw);

    let clustering = kmeans(&standardized, n_clusters, DEFAULT_RESTARTS, seed);

    // Vibe weights are calibrated to raw descriptor ranges, so the
    // labeler scores raw-space member means rather than the
    // standardized centroids.
    let raw_centroids = cluster_raw_means(&raw, &clustering.assignments, n_clusters);
    let labels = bank.label_centroids(&raw_centroids, n_clusters);

    let tracks: Vec<AnalyzedTrack> = linked
        .into_iter()
        .zip(clustering.assignments.iter())
        .map(|(track, &cluster)| AnalyzedTrack {
            id: track.id,
            name: track.name,
            artists: track.artists,
            features: track.features,
            cluster,
            vibe: labels[cluster].to_string(),
            stage: track.stage,
        })
        .collect();

    let analysis = PlaylistAnalysis {
        tracks,
        feature_means,
        standardized,
        cluster_ids: clustering.assignments,
        centroids: clustering.centroids,
    };

    info!(
        "Analyzed playlist: {} tracks, {} clusters, {} distinct vibes.",
        analysis.tracks.len(),
        n_clusters,
        analysis.distinct_vibes().len()
    );

    Ok(analysis)
}

/// Mean raw feature vector per cluster.
fn cluster_raw_means(
    raw: &[FeatureVector],
    assignments: &[usize],
    n_clusters: usize,
) -> Vec<FeatureVector> {
    let mut sums = vec![[0.0; FEATURE_COUNT]; n_clusters];
    let mut counts = vec![0usize; n_clusters];
    for (row, &cluster) in raw.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (col, value) in row.iter().enumerate() {
            sums[cluster][col] += value;
        }
    }
    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            for value in sum.iter_mut() {
                *value /= count as f64;
            }
        }
    }
    sums
}
