//! Semantic "vibe" labeling of cluster centroids.
//!
//! Each vibe category is a hand-weighted linear combination of the nine
//! audio descriptors. A term's direction says whether a high or a low
//! value supports the category, and the weights of a category sum to
//! 1.0. The bank is validated once; scoring is a plain weighted sum over
//! the centroid mapped to unit range.
//!
//! When fewer vibes than the full bank are requested, only the first N
//! categories of the canonical ordered list are eligible. Larger
//! requested counts unlock strictly more categories, never different
//! ones. Two clusters may well end up with the same vibe; that just
//! means the clustering found a distinction finer than the vocabulary.

use crate::features::{AudioFeature, FeatureVector};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest and largest eligible-category counts by product contract.
pub const MIN_VIBE_CATEGORIES: usize = 3;
pub const MAX_VIBE_CATEGORIES: usize = 8;

/// Whether a high or a low descriptor value supports the category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    High,
    Low,
}

/// One weighted descriptor contribution to a category score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub feature: AudioFeature,
    pub weight: f64,
    pub direction: Direction,
}

/// A named vibe category and its scoring weights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VibeCategory {
    pub name: String,
    pub terms: Vec<WeightedTerm>,
}

impl VibeCategory {
    /// Score a raw-space centroid against this category.
    ///
    /// Descriptors are mapped to unit range first (tempo and loudness
    /// need it, the rest already live in 0-1); a `Low` direction scores
    /// the complement.
    pub fn score(&self, centroid: &FeatureVector) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                let value = term.feature.to_unit_range(centroid[term.feature.index()]);
                let oriented = match term.direction {
                    Direction::High => value,
                    Direction::Low => 1.0 - value,
                };
                term.weight * oriented
            })
            .sum()
    }
}

/// The vibe bank failed validation.
#[derive(Debug, Error, PartialEq)]
pub enum VibeBankError {
    #[error("vibe bank has no categories")]
    EmptyBank,
    #[error("category '{name}' has no terms")]
    EmptyCategory { name: String },
    #[error("duplicate category name '{name}'")]
    DuplicateName { name: String },
    #[error("category '{name}' weights sum to {sum}, expected 1.0")]
    BadWeightSum { name: String, sum: f64 },
    #[error("category '{name}' has a non-positive weight on '{feature}'")]
    NonPositiveWeight { name: String, feature: &'static str },
}

/// An ordered, validated bank of vibe categories.
///
/// The order is canonical and load-bearing: restricted vibe counts take
/// a prefix of it, and score ties resolve to the earliest category.
#[derive(Clone, Debug)]
pub struct VibeBank {
    categories: Vec<VibeCategory>,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl VibeBank {
    /// Validate and build a bank. Weights of each category must sum to
    /// 1.0 and be positive; names must be unique. Feature references are
    /// typed, so unknown feature names cannot get this far.
    pub fn new(categories: Vec<VibeCategory>) -> Result<Self, VibeBankError> {
        if categories.is_empty() {
            return Err(VibeBankError::EmptyBank);
        }
        for (idx, category) in categories.iter().enumerate() {
            if category.terms.is_empty() {
                return Err(VibeBankError::EmptyCategory {
                    name: category.name.clone(),
                });
            }
            if categories[..idx].iter().any(|c| c.name == category.name) {
                return Err(VibeBankError::DuplicateName {
                    name: category.name.clone(),
                });
            }
            for term in &category.terms {
                if term.weight <= 0.0 {
                    return Err(VibeBankError::NonPositiveWeight {
                        name: category.name.clone(),
                        feature: term.feature.as_str(),
                    });
                }
            }
            let sum: f64 = category.terms.iter().map(|t| t.weight).sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(VibeBankError::BadWeightSum {
                    name: category.name.clone(),
                    sum,
                });
            }
        }
        Ok(Self { categories })
    }

    /// The built-in category bank.
    pub fn builtin() -> &'static VibeBank {
        &BUILTIN_BANK
    }

    /// Parse a bank from a JSON array of categories.
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let categories: Vec<VibeCategory> = serde_json::from_str(json)?;
        Ok(Self::new(categories)?)
    }

    /// Serialize the bank's categories to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.categories).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn categories(&self) -> &[VibeCategory] {
        &self.categories
    }

    /// The categories eligible for a request of `n_vibes` vibes: the
    /// first N in canonical order, with N clamped into
    /// [`MIN_VIBE_CATEGORIES`, `MAX_VIBE_CATEGORIES`] and the bank size.
    pub fn eligible(&self, n_vibes: usize) -> &[VibeCategory] {
        let n = n_vibes
            .clamp(MIN_VIBE_CATEGORIES, MAX_VIBE_CATEGORIES)
            .min(self.categories.len());
        &self.categories[..n]
    }

    /// Label one raw-space centroid: the best-scoring eligible category.
    /// Ties resolve to the earliest category in canonical order (strict
    /// comparison during the scan, never a data structure's iteration
    /// order).
    pub fn label_centroid(&self, centroid: &FeatureVector, n_vibes: usize) -> &str {
        let eligible = self.eligible(n_vibes);
        let mut best = &eligible[0];
        let mut best_score = best.score(centroid);
        for category in &eligible[1..] {
            let score = category.score(centroid);
            if score > best_score {
                best = category;
                best_score = score;
            }
        }
        &best.name
    }

    /// Label every centroid of a clustering run.
    pub fn label_centroids(&self, centroids: &[FeatureVector], n_vibes: usize) -> Vec<&str> {
        centroids
            .iter()
            .map(|centroid| self.label_centroid(centroid, n_vibes))
            .collect()
    }
}

fn term(feature: AudioFeature, weight: f64, direction: Direction) -> WeightedTerm {
    WeightedTerm {
        feature,
        weight,
        direction,
    }
}

fn builtin_categories() -> Vec<VibeCategory> {
    use AudioFeature::*;
    use Direction::{High, Low};

    vec![
        VibeCategory {
            name: "Party / Upbeat".to_string(),
            terms: vec![
                term(Energy, 0.30, High),
                term(Danceability, 0.25, High),
                term(Valence, 0.15, High),
                term(Loudness, 0.15, High),
                term(Tempo, 0.10, High),
                term(Speechiness, 0.05, High),
            ],
        },
        VibeCategory {
            name: "Chill / Acoustic".to_string(),
            terms: vec![
                term(Acousticness, 0.35, High),
                term(Liveness, 0.25, High),
                term(Energy, 0.15, Low),
                term(Loudness, 0.15, Low),
                term(Danceability, 0.10, Low),
            ],
        },
        VibeCategory {
            name: "Happy / Feel-good".to_string(),
            terms: vec![
                term(Valence, 0.35, High),
                term(Danceability, 0.25, High),
                term(Energy, 0.20, High),
                term(Tempo, 0.10, High),
                term(Loudness, 0.10, High),
            ],
        },
        VibeCategory {
            name: "Dark / Intense".to_string(),
            terms: vec![
                term(Energy, 0.30, High),
                term(Valence, 0.25, Low),
                term(Loudness, 0.20, High),
                term(Speechiness, 0.15, High),
                term(Acousticness, 0.10, Low),
            ],
        },
        VibeCategory {
            name: "Instrumental / Dreamy".to_string(),
            terms: vec![
                term(Instrumentalness, 0.40, High),
                term(Energy, 0.20, High),
                term(Acousticness, 0.15, High),
                term(Liveness, 0.15, High),
                term(Speechiness, 0.10, Low),
            ],
        },
        VibeCategory {
            name: "Romantic / Smooth".to_string(),
            terms: vec![
                term(Acousticness, 0.30, High),
                term(Valence, 0.25, High),
                term(Energy, 0.20, Low),
                term(Loudness, 0.15, Low),
                term(Danceability, 0.10, High),
            ],
        },
        VibeCategory {
            name: "Energetic / Aggressive".to_string(),
            terms: vec![
                term(Energy, 0.35, High),
                term(Loudness, 0.25, High),
                term(Speechiness, 0.20, High),
                term(Acousticness, 0.15, Low),
                term(Tempo, 0.05, High),
            ],
        },
        VibeCategory {
            name: "Melancholic / Sad".to_string(),
            terms: vec![
                term(Valence, 0.30, Low),
                term(Acousticness, 0.28, High),
                term(Loudness, 0.20, Low),
                term(Energy, 0.12, Low),
                term(Liveness, 0.10, High),
            ],
        },
    ]
}

lazy_static! {
    static ref BUILTIN_BANK: VibeBank =
        VibeBank::new(builtin_categories()).expect("built-in vibe bank is valid");
}
