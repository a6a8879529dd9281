//! Catalog loading boundary.

use super::Catalog;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Parse and build a catalog from a JSON array of track records, as
/// handed over by the dataset collaborator.
///
/// Non-fatal row problems are logged and tolerated; a table whose shape
/// is wrong (missing identity columns) or that yields no usable rows is
/// an error.
pub fn load_catalog(json: &str) -> Result<Catalog> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).context("Failed to parse catalog records.")?;

    let build = Catalog::from_json_records(&records).context("Catalog schema is invalid.")?;
    let problems = build.problems;
    let catalog = build.catalog;

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
    }

    if catalog.is_empty() {
        bail!("Catalog has no usable rows");
    }

    let stats = catalog.stats();
    info!(
        "Catalog has {} tracks by {} artists.",
        stats.total_tracks, stats.unique_artists
    );
    let missing: usize = stats.missing_counts.iter().sum();
    if missing > 0 {
        info!("{} feature values are missing across the catalog.", missing);
    }

    Ok(catalog)
}
