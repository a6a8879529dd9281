//! The fixed audio descriptor vocabulary shared by the catalog and the
//! analysis pipeline.
//!
//! Every track is described by the same nine numeric descriptors, always
//! in the same order. The order matters: feature vectors are plain fixed
//! arrays indexed by [`AudioFeature::index`].

use serde::{Deserialize, Serialize};

/// Number of audio descriptors per track.
pub const FEATURE_COUNT: usize = 9;

/// A track's descriptors, in canonical [`AudioFeature::ALL`] order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Upper bound of the tempo range (BPM) used for unit-range mapping.
pub const TEMPO_MAX_BPM: f64 = 246.0;

/// Loudness range (dB) used for unit-range mapping.
pub const LOUDNESS_MIN_DB: f64 = -60.0;
pub const LOUDNESS_MAX_DB: f64 = 5.0;

/// One of the nine audio descriptors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    Danceability,
    Energy,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
    Speechiness,
    Loudness,
}

impl AudioFeature {
    /// All descriptors in canonical column order.
    pub const ALL: [AudioFeature; FEATURE_COUNT] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Liveness,
        AudioFeature::Valence,
        AudioFeature::Tempo,
        AudioFeature::Speechiness,
        AudioFeature::Loudness,
    ];

    /// Column index of this descriptor in a [`FeatureVector`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Column name as used by the dataset collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Loudness => "loudness",
        }
    }

    /// Parse a column name, returning `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "danceability" => Some(AudioFeature::Danceability),
            "energy" => Some(AudioFeature::Energy),
            "acousticness" => Some(AudioFeature::Acousticness),
            "instrumentalness" => Some(AudioFeature::Instrumentalness),
            "liveness" => Some(AudioFeature::Liveness),
            "valence" => Some(AudioFeature::Valence),
            "tempo" => Some(AudioFeature::Tempo),
            "speechiness" => Some(AudioFeature::Speechiness),
            "loudness" => Some(AudioFeature::Loudness),
            _ => None,
        }
    }

    /// Map a raw descriptor value onto the 0-1 range that the vibe
    /// category weights are calibrated for.
    ///
    /// Most descriptors already live in 0-1; tempo is scaled against the
    /// 0-246 BPM range and loudness against -60..5 dB (clamped).
    pub fn to_unit_range(&self, value: f64) -> f64 {
        match self {
            AudioFeature::Tempo => {
                if value > 0.0 {
                    value / TEMPO_MAX_BPM
                } else {
                    0.0
                }
            }
            AudioFeature::Loudness => {
                if value >= LOUDNESS_MIN_DB {
                    ((value - LOUDNESS_MIN_DB) / (LOUDNESS_MAX_DB - LOUDNESS_MIN_DB))
                        .clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_indexes() {
        for (i, feature) in AudioFeature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for feature in AudioFeature::ALL {
            assert_eq!(AudioFeature::parse(feature.as_str()), Some(feature));
        }
        assert_eq!(AudioFeature::parse("popularity"), None);
    }

    #[test]
    fn test_tempo_unit_range() {
        assert_eq!(AudioFeature::Tempo.to_unit_range(0.0), 0.0);
        assert_eq!(AudioFeature::Tempo.to_unit_range(-10.0), 0.0);
        assert!((AudioFeature::Tempo.to_unit_range(123.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_loudness_unit_range() {
        assert_eq!(AudioFeature::Loudness.to_unit_range(-60.0), 0.0);
        assert_eq!(AudioFeature::Loudness.to_unit_range(-80.0), 0.0);
        assert_eq!(AudioFeature::Loudness.to_unit_range(5.0), 1.0);
        assert_eq!(AudioFeature::Loudness.to_unit_range(20.0), 1.0);
        let mid = AudioFeature::Loudness.to_unit_range(-27.5);
        assert!((mid - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unit_range_passthrough_for_bounded_features() {
        assert_eq!(AudioFeature::Energy.to_unit_range(0.73), 0.73);
        assert_eq!(AudioFeature::Valence.to_unit_range(0.0), 0.0);
    }
}
