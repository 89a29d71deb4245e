//! Heuristic candidate detection.
//!
//! Produces a fixed template of typical urban greening opportunities laid
//! out around the search centre, then keeps the best-scoring ones. This is
//! a stand-in for real gap analysis of street and building data.

use std::collections::BTreeSet;

use green_map_site_models::{CandidateSite, DetectionRequest, LngLat, SiteFeatures, SiteType};

use crate::{DEFAULT_TOP_K, ScoringError, ScoringWeights, score_and_rank};

/// A candidate site positioned relative to the search centre.
struct SiteTemplate {
    d_lng: f64,
    d_lat: f64,
    area: f64,
    confidence: f64,
    site_type: SiteType,
    description: &'static str,
    current_use: &'static str,
    potential: &'static str,
}

const HEURISTIC_TEMPLATES: &[SiteTemplate] = &[
    SiteTemplate {
        d_lng: 0.002,
        d_lat: 0.001,
        area: 85.0,
        confidence: 0.92,
        site_type: SiteType::VacantLot,
        description: "Vacant lot identified through gap analysis. Area between buildings with good street access.",
        current_use: "Unused space between buildings",
        potential: "Community garden with native plants and seating area",
    },
    SiteTemplate {
        d_lng: -0.001,
        d_lat: 0.002,
        area: 120.0,
        confidence: 0.88,
        site_type: SiteType::ParkingLot,
        description: "Underutilized parking area with low usage patterns. Adjacent to sidewalk for community access.",
        current_use: "Occasional parking space",
        potential: "Permeable paving with native plant islands and rain gardens",
    },
    SiteTemplate {
        d_lng: 0.001,
        d_lat: -0.001,
        area: 65.0,
        confidence: 0.85,
        site_type: SiteType::Rooftop,
        description: "Flat rooftop space identified through building footprint analysis. Good structural capacity.",
        current_use: "Unused rooftop",
        potential: "Green roof with urban farming and air quality improvement",
    },
    SiteTemplate {
        d_lng: -0.002,
        d_lat: -0.001,
        area: 45.0,
        confidence: 0.90,
        site_type: SiteType::Median,
        description: "Street median with low vegetation. High pedestrian traffic area.",
        current_use: "Basic grass median",
        potential: "Native plant median with pollinator support",
    },
];

/// Checks that a detection request has a valid centre and a positive radius.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidInput`] describing the bad field.
pub fn validate_request(request: &DetectionRequest) -> Result<(), ScoringError> {
    if !request.coordinates.is_valid() {
        return Err(ScoringError::invalid(format!(
            "coordinates [{}, {}] are not a valid longitude/latitude pair",
            request.coordinates.lng, request.coordinates.lat
        )));
    }
    if !request.radius.is_finite() || request.radius <= 0.0 {
        return Err(ScoringError::invalid(format!(
            "radius must be positive, got {}",
            request.radius
        )));
    }
    Ok(())
}

fn from_template(index: usize, center: LngLat, template: &SiteTemplate) -> CandidateSite {
    CandidateSite {
        id: format!("heuristics-{}", index + 1),
        coordinates: center.offset(template.d_lng, template.d_lat),
        area: template.area,
        confidence: template.confidence,
        site_type: template.site_type,
        description: template.description.to_string(),
        current_use: template.current_use.to_string(),
        potential: template.potential.to_string(),
        features: SiteFeatures::PLACEHOLDER,
    }
}

/// Returns every heuristic candidate around the request centre, unscored.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidInput`] if the request is invalid.
pub fn detect_candidates(request: &DetectionRequest) -> Result<Vec<CandidateSite>, ScoringError> {
    validate_request(request)?;
    Ok(HEURISTIC_TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, template)| from_template(i, request.coordinates, template))
        .collect())
}

/// Detects candidates around the request centre and returns the
/// [`DEFAULT_TOP_K`] best by composite score.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidInput`] if the request or weights are
/// invalid.
pub fn detect_sites(
    request: &DetectionRequest,
    weights: &ScoringWeights,
) -> Result<Vec<CandidateSite>, ScoringError> {
    let candidates = detect_candidates(request)?;
    log::debug!(
        "Scoring {} heuristic candidates around [{}, {}] ({} area)",
        candidates.len(),
        request.coordinates.lng,
        request.coordinates.lat,
        request.area_type
    );
    score_and_rank(candidates, DEFAULT_TOP_K, weights)
}

/// Combines two candidate lists, highest confidence first.
///
/// Equal confidences keep their combined input order. Site ids stay
/// unique: a site whose id already appeared earlier (in `first`, or
/// earlier in `second`) is dropped.
#[must_use]
pub fn merge_by_confidence(
    first: Vec<CandidateSite>,
    second: Vec<CandidateSite>,
) -> Vec<CandidateSite> {
    let mut seen = BTreeSet::new();
    let mut merged: Vec<CandidateSite> = Vec::with_capacity(first.len() + second.len());
    for site in first.into_iter().chain(second) {
        if seen.insert(site.id.clone()) {
            merged.push(site);
        } else {
            log::warn!("Dropping site {} from merge: duplicate id", site.id);
        }
    }
    merged.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    merged
}
