//! Shared catalog and playlist fixtures for the pipeline tests.
#![allow(dead_code)]

use vibes_analyzer::{Catalog, CatalogTrack, FeatureVector, PlaylistTrack};

/// Build a feature vector in canonical column order.
#[allow(clippy::too_many_arguments)]
pub fn feature_row(
    danceability: f64,
    energy: f64,
    acousticness: f64,
    instrumentalness: f64,
    liveness: f64,
    valence: f64,
    tempo: f64,
    speechiness: f64,
    loudness: f64,
) -> FeatureVector {
    [
        danceability,
        energy,
        acousticness,
        instrumentalness,
        liveness,
        valence,
        tempo,
        speechiness,
        loudness,
    ]
}

pub fn make_catalog_track(id: &str, features: FeatureVector) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: format!("Artist {}", id),
        features,
    }
}

/// Nine varied catalog rows, ids "A" through "I": three loud party-ish
/// tracks, three quiet acoustic ones, three instrumental mid-energy
/// ones.
pub fn make_varied_catalog() -> Catalog {
    Catalog::from_tracks(vec![
        make_catalog_track("A", feature_row(0.8, 0.8, 0.1, 0.1, 0.1, 0.5, 120.0, 0.1, -5.0)),
        make_catalog_track("B", feature_row(0.85, 0.9, 0.05, 0.0, 0.15, 0.6, 128.0, 0.08, -4.0)),
        make_catalog_track("C", feature_row(0.75, 0.85, 0.12, 0.05, 0.2, 0.55, 124.0, 0.12, -6.0)),
        make_catalog_track("D", feature_row(0.3, 0.2, 0.9, 0.1, 0.3, 0.4, 90.0, 0.04, -18.0)),
        make_catalog_track("E", feature_row(0.25, 0.15, 0.95, 0.2, 0.25, 0.35, 85.0, 0.03, -20.0)),
        make_catalog_track("F", feature_row(0.35, 0.25, 0.85, 0.15, 0.35, 0.45, 95.0, 0.05, -16.0)),
        make_catalog_track("G", feature_row(0.5, 0.5, 0.4, 0.9, 0.2, 0.5, 110.0, 0.03, -10.0)),
        make_catalog_track("H", feature_row(0.55, 0.55, 0.35, 0.85, 0.25, 0.55, 112.0, 0.04, -9.0)),
        make_catalog_track("I", feature_row(0.45, 0.45, 0.45, 0.95, 0.15, 0.45, 108.0, 0.02, -11.0)),
    ])
}

/// A playlist referencing catalog rows by id, with the catalog's own
/// names and artists.
pub fn make_playlist(ids: &[&str]) -> Vec<PlaylistTrack> {
    ids.iter()
        .map(|id| PlaylistTrack {
            id: Some(id.to_string()),
            name: format!("Track {}", id),
            artists: format!("Artist {}", id),
        })
        .collect()
}

pub fn make_playlist_track(id: Option<&str>, name: &str, artists: &str) -> PlaylistTrack {
    PlaylistTrack {
        id: id.map(str::to_string),
        name: name.to_string(),
        artists: artists.to_string(),
    }
}
