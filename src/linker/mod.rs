//! Record linkage between a user playlist and the reference catalog.
//!
//! Linking runs in two explicit stages: an exact join on the external
//! catalog id, then a fallback join on the normalized (title, artists)
//! identity key for tracks the first stage could not fully resolve.
//! Tracks still missing features after both stages are dropped. Each
//! surviving track records which stage resolved it, so the provenance of
//! a match stays inspectable.

pub mod identity;

use crate::catalog::Catalog;
use crate::features::FeatureVector;
use identity::{normalize_artists, normalize_title};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A track supplied by the user's playlist. The external id is often
/// missing or stale; title and artists are usually reliable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: String,
}

/// Which linkage stage resolved a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    ExactId,
    TitleArtist,
}

/// A playlist track joined to a catalog row with complete features.
///
/// Identity fields always carry the playlist's own values, never the
/// matched catalog row's, so user-visible names stay consistent with
/// what was requested.
#[derive(Clone, Debug, Serialize)]
pub struct LinkedTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: String,
    pub features: FeatureVector,
    pub stage: MatchStage,
}

/// Stage 1: exact join on the external catalog id. Only a hit with
/// complete features finalizes the track.
fn link_by_id(track: &PlaylistTrack, catalog: &Catalog) -> Option<FeatureVector> {
    let id = track.id.as_deref()?;
    catalog
        .get_by_id(id)
        .filter(|hit| hit.has_all_features())
        .map(|hit| hit.features)
}

/// Stage 2: fallback join on the normalized (title, artists) key,
/// against the catalog's deduplicated identity index.
fn link_by_identity(track: &PlaylistTrack, catalog: &Catalog) -> Option<FeatureVector> {
    let title_key = normalize_title(&track.name);
    let artists_key = normalize_artists(&track.artists);
    catalog
        .get_by_identity(&title_key, &artists_key)
        .filter(|hit| hit.has_all_features())
        .map(|hit| hit.features)
}

/// Join playlist tracks to the catalog, producing the maximal set of
/// fully-resolved tracks in playlist order.
///
/// Duplicate playlist entries are preserved as distinct rows; the
/// playlist is never deduplicated. An empty result is not an error here,
/// the pipeline entry point decides how to surface it.
pub fn link_playlist(playlist: &[PlaylistTrack], catalog: &Catalog) -> Vec<LinkedTrack> {
    let mut exact = 0usize;
    let mut fallback = 0usize;

    let linked: Vec<LinkedTrack> = playlist
        .iter()
        .filter_map(|track| {
            let (features, stage) = match link_by_id(track, catalog) {
                Some(features) => {
                    exact += 1;
                    (features, MatchStage::ExactId)
                }
                None => {
                    let features = link_by_identity(track, catalog)?;
                    fallback += 1;
                    (features, MatchStage::TitleArtist)
                }
            };
            Some(LinkedTrack {
                id: track.id.clone(),
                name: track.name.clone(),
                artists: track.artists.clone(),
                features,
                stage,
            })
        })
        .collect();

    info!(
        "Linked {} of {} playlist tracks ({} by id, {} by title/artist, {} dropped).",
        linked.len(),
        playlist.len(),
        exact,
        fallback,
        playlist.len() - linked.len()
    );

    linked
}
