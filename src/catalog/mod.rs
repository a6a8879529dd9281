//! Reference catalog of tracks annotated with audio descriptors.
//!
//! The catalog is built once from the dataset collaborator's records and
//! is read-only afterwards: the analysis pipeline only ever looks tracks
//! up through its identity indexes, so concurrent requests can share it
//! without locking.

mod load;

pub use load::load_catalog;

use crate::features::{AudioFeature, FeatureVector, FEATURE_COUNT};
use crate::linker::identity::{normalize_artists, normalize_title};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Required identity columns of the catalog table.
const REQUIRED_COLUMNS: [&str; 3] = ["id", "name", "artists"];

/// An immutable catalog row.
///
/// `features` holds NaN for descriptors the source row did not provide;
/// such rows stay in the catalog (they can still be identified) but the
/// linker never finalizes a match against them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub features: FeatureVector,
}

impl CatalogTrack {
    /// True when all nine descriptors are present and finite.
    pub fn has_all_features(&self) -> bool {
        self.features.iter().all(|v| v.is_finite())
    }
}

/// The catalog table does not have the shape this core requires.
/// Fatal for the request; the input must be fixed before retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("catalog records must be JSON objects")]
    NotAnObject,
}

/// A non-fatal issue found while ingesting catalog records.
/// The offending value is skipped, the rest of the catalog stands.
#[derive(Debug)]
pub enum LoadProblem {
    MissingId { row: usize },
    MalformedFeature { row: usize, feature: AudioFeature },
}

/// Result of building a catalog: the catalog itself plus whatever
/// non-fatal problems were found along the way.
#[derive(Debug)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub problems: Vec<LoadProblem>,
}

/// Summary statistics over the catalog's tracks.
#[derive(Clone, Debug, Serialize)]
pub struct CatalogStats {
    pub total_tracks: usize,
    pub unique_artists: usize,
    /// Per-feature mean over rows where the feature is present.
    pub feature_means: FeatureVector,
    /// Per-feature sample standard deviation over rows where present.
    pub feature_stds: FeatureVector,
    /// Per-feature count of rows missing that feature.
    pub missing_counts: [usize; FEATURE_COUNT],
}

/// The reference catalog, indexed for the two linkage stages.
#[derive(Debug)]
pub struct Catalog {
    tracks: Vec<CatalogTrack>,
    by_id: HashMap<String, usize>,
    /// Keyed by (normalized title, normalized artists). When several rows
    /// share a key, the first one in catalog order wins; duplicates carry
    /// no signal that would rank them, so the choice is arbitrary but
    /// deterministic.
    by_identity: HashMap<(String, String), usize>,
}

impl Catalog {
    /// Build a catalog from already-typed tracks.
    pub fn from_tracks(tracks: Vec<CatalogTrack>) -> Self {
        let mut by_id = HashMap::with_capacity(tracks.len());
        let mut by_identity = HashMap::with_capacity(tracks.len());
        for (idx, track) in tracks.iter().enumerate() {
            by_id.entry(track.id.clone()).or_insert(idx);
            let key = (
                normalize_title(&track.name),
                normalize_artists(&track.artists),
            );
            by_identity.entry(key).or_insert(idx);
        }
        Self {
            tracks,
            by_id,
            by_identity,
        }
    }

    /// Build a catalog from the dataset collaborator's columnar records.
    ///
    /// The table must carry the `id`, `name` and `artists` columns;
    /// feature columns may be absent (their values load as NaN). Rows
    /// with a missing or blank `id` are excluded and reported as
    /// problems, not errors.
    pub fn from_json_records(records: &[Value]) -> Result<CatalogBuild, SchemaViolation> {
        if let Some(first) = records.first() {
            let object = first.as_object().ok_or(SchemaViolation::NotAnObject)?;
            for column in REQUIRED_COLUMNS {
                if !object.contains_key(column) {
                    return Err(SchemaViolation::MissingColumn(column));
                }
            }
        }

        let mut problems = Vec::new();
        let mut tracks = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let id = match scalar_as_string(record.get("id")) {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    problems.push(LoadProblem::MissingId { row });
                    continue;
                }
            };
            let name = scalar_as_string(record.get("name")).unwrap_or_default();
            let artists = scalar_as_string(record.get("artists")).unwrap_or_default();

            let mut features = [f64::NAN; FEATURE_COUNT];
            for feature in AudioFeature::ALL {
                match record.get(feature.as_str()) {
                    None | Some(Value::Null) => {}
                    Some(value) => match value.as_f64() {
                        Some(v) => features[feature.index()] = v,
                        None => problems.push(LoadProblem::MalformedFeature { row, feature }),
                    },
                }
            }

            tracks.push(CatalogTrack {
                id,
                name,
                artists,
                features,
            });
        }

        Ok(CatalogBuild {
            catalog: Self::from_tracks(tracks),
            problems,
        })
    }

    pub fn tracks(&self) -> &[CatalogTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Look up a track by its external catalog id.
    pub fn get_by_id(&self, id: &str) -> Option<&CatalogTrack> {
        self.by_id.get(id).map(|&idx| &self.tracks[idx])
    }

    /// Look up a track by its normalized (title, artists) identity key.
    pub fn get_by_identity(&self, title_key: &str, artists_key: &str) -> Option<&CatalogTrack> {
        self.by_identity
            .get(&(title_key.to_string(), artists_key.to_string()))
            .map(|&idx| &self.tracks[idx])
    }

    /// Compute summary statistics over the catalog.
    pub fn stats(&self) -> CatalogStats {
        let mut unique_artists = HashSet::new();
        for track in &self.tracks {
            unique_artists.insert(normalize_artists(&track.artists));
        }
        unique_artists.remove("");

        let mut feature_means = [0.0; FEATURE_COUNT];
        let mut feature_stds = [0.0; FEATURE_COUNT];
        let mut missing_counts = [0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            let values: Vec<f64> = self
                .tracks
                .iter()
                .map(|t| t.features[col])
                .filter(|v| v.is_finite())
                .collect();
            missing_counts[col] = self.tracks.len() - values.len();
            if values.is_empty() {
                feature_means[col] = f64::NAN;
                feature_stds[col] = f64::NAN;
                continue;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            feature_means[col] = mean;
            feature_stds[col] = if values.len() < 2 {
                0.0
            } else {
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / (values.len() - 1) as f64;
                var.sqrt()
            };
        }

        CatalogStats {
            total_tracks: self.tracks.len(),
            unique_artists: unique_artists.len(),
            feature_means,
            feature_stds,
            missing_counts,
        }
    }
}

fn scalar_as_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
