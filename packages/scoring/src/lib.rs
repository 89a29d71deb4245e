#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site scoring and ranking.
//!
//! Every candidate gets a composite score from four independently
//! normalized features combined linearly:
//!
//! ```text
//! score = w.area * areaNorm
//!       + w.access * access
//!       + w.vegetation * (1 - vegetation)
//!       + w.proximity * proximityToGreen
//! ```
//!
//! Candidates are then stable-sorted by descending score and the first `k`
//! are returned. All functions here are pure.

pub mod detection;

use green_map_site_models::CandidateSite;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Area (m²) at which the area feature saturates.
pub const AREA_CAP_SQ_M: f64 = 1000.0;

/// Number of sites returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 3;

/// Errors that can occur while scoring sites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// A numeric input was malformed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },
}

impl ScoringError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Linear weights for the composite score.
///
/// The defaults sum to 1.0, which keeps scores in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Weight of the normalized area.
    pub area: f64,
    /// Weight of the accessibility proxy.
    pub access: f64,
    /// Weight of the inverted vegetation density.
    pub vegetation: f64,
    /// Weight of the proximity to existing green space.
    pub proximity: f64,
}

impl ScoringWeights {
    /// Checks that every weight is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidInput`] naming the first bad weight.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let named = [
            ("area", self.area),
            ("access", self.access),
            ("vegetation", self.vegetation),
            ("proximity", self.proximity),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::invalid(format!(
                    "{name} weight must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            area: 0.4,
            access: 0.3,
            vegetation: 0.2,
            proximity: 0.1,
        }
    }
}

/// A site paired with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSite {
    /// The scored site.
    #[serde(flatten)]
    pub site: CandidateSite,
    /// Composite score.
    pub score: f64,
}

/// Normalizes an area to `[0, 1]`, saturating at [`AREA_CAP_SQ_M`].
#[must_use]
pub fn area_norm(area: f64) -> f64 {
    (area / AREA_CAP_SQ_M).min(1.0)
}

/// Computes the composite score of a single site.
///
/// Does not validate its input; see [`rank_sites`].
#[must_use]
pub fn score_site(site: &CandidateSite, weights: &ScoringWeights) -> f64 {
    let features = &site.features;
    weights.area * area_norm(site.area)
        + weights.access * features.access
        + weights.vegetation * (1.0 - features.vegetation)
        + weights.proximity * features.proximity_to_green
}

fn validate_site(site: &CandidateSite) -> Result<(), ScoringError> {
    if !site.area.is_finite() || site.area <= 0.0 {
        return Err(ScoringError::invalid(format!(
            "site {} has non-positive area {}",
            site.id, site.area
        )));
    }
    if !(0.0..=1.0).contains(&site.confidence) {
        return Err(ScoringError::invalid(format!(
            "site {} has confidence {} outside [0, 1]",
            site.id, site.confidence
        )));
    }
    if !site.features.is_normalized() {
        return Err(ScoringError::invalid(format!(
            "site {} has scoring features outside [0, 1]: {:?}",
            site.id, site.features
        )));
    }
    Ok(())
}

/// Scores every candidate and returns the best `k` with their scores.
///
/// Sorting is stable, so equal scores keep their input order.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidInput`] if any candidate has a
/// non-positive area, a confidence outside `[0, 1]` or out-of-range
/// features, or if a weight is invalid.
pub fn rank_sites(
    candidates: Vec<CandidateSite>,
    k: usize,
    weights: &ScoringWeights,
) -> Result<Vec<RankedSite>, ScoringError> {
    weights.validate()?;
    for site in &candidates {
        validate_site(site)?;
    }

    let mut ranked: Vec<RankedSite> = candidates
        .into_iter()
        .map(|site| {
            let score = score_site(&site, weights);
            log::trace!("Scored site {} at {score:.4}", site.id);
            RankedSite { site, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);

    Ok(ranked)
}

/// Scores every candidate and returns the best `k`, highest score first.
///
/// # Errors
///
/// See [`rank_sites`].
pub fn score_and_rank(
    candidates: Vec<CandidateSite>,
    k: usize,
    weights: &ScoringWeights,
) -> Result<Vec<CandidateSite>, ScoringError> {
    Ok(rank_sites(candidates, k, weights)?
        .into_iter()
        .map(|ranked| ranked.site)
        .collect())
}
