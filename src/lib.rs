//! Playlist vibe analysis core.
//!
//! Matches a user playlist against a reference catalog of tracks
//! annotated with audio descriptors, clusters the matched tracks into a
//! small number of semantically labeled "vibe" groups, and produces
//! per-cluster summaries, representative tracks, and diversity metrics.
//!
//! The web dashboard, Spotify client, and dataset manager live outside
//! this crate; they hand over playlists and catalog records and render
//! the [`analysis::PlaylistAnalysis`] this core returns.

pub mod analysis;
pub mod catalog;
pub mod features;
pub mod linker;

// Re-export commonly used types for convenience
pub use analysis::diversity::DiversityMetrics;
pub use analysis::representatives::{ClusterRepresentatives, DEFAULT_REPRESENTATIVES};
pub use analysis::vibes::VibeBank;
pub use analysis::{
    analyze, analyze_with_bank, AnalysisError, AnalyzedTrack, PlaylistAnalysis, VibeSummary,
    DEFAULT_CLUSTERS, DEFAULT_SEED,
};
pub use catalog::{load_catalog, Catalog, CatalogTrack, SchemaViolation};
pub use features::{AudioFeature, FeatureVector, FEATURE_COUNT};
pub use linker::{link_playlist, LinkedTrack, MatchStage, PlaylistTrack};
