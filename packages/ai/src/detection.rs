//! Generator-backed site detection.
//!
//! The generator is asked for a `{"sites": [...]}` JSON document. Its reply
//! is untrusted: each site is checked for a known type, a positive area, a
//! confidence in `[0, 1]` and a location near the search centre before it
//! is accepted.

use std::collections::BTreeSet;

use geo::{Distance, Haversine, Point};
use green_map_scoring::{ScoringError, ScoringWeights, detection as heuristics};
use green_map_site_models::{
    CandidateSite, DetectionMethod, DetectionRequest, SiteFeatures, SiteType,
};
use serde::Deserialize;

use crate::AiError;
use crate::providers::{CompletionRequest, LlmProvider};

/// Radius floor (m) used when checking how far a generated site may lie
/// from the search centre.
pub const MIN_VALIDATION_RADIUS_M: f64 = 500.0;

/// Generated sites may lie at most this many validation radii from the
/// search centre.
pub const MAX_DISTANCE_FACTOR: f64 = 4.0;

const SYSTEM_PROMPT: &str = "You are an expert urban planner and AI assistant specializing in \
identifying urban greening opportunities. Analyze urban data to find potential sites for \
community gardens, green roofs, and other greening projects. Reply with JSON only.";

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

#[derive(Deserialize)]
struct GeneratedSites {
    sites: Vec<serde_json::Value>,
}

/// Builds the completion request for a detection search.
#[must_use]
pub fn detection_prompt(request: &DetectionRequest) -> CompletionRequest {
    let center = request.coordinates;
    let site_types = SiteType::all()
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("|");

    let prompt = format!(
        r#"Analyze the urban area at latitude {lat}, longitude {lng} with a radius of {radius}m in a {area_type} setting.

Identify potential greening opportunities and return 2-3 sites in this JSON format:

{{
  "sites": [
    {{
      "id": "unique_id",
      "coordinates": [lng, lat],
      "area": area_in_square_meters,
      "confidence": 0.0_to_1.0,
      "siteType": "{site_types}",
      "description": "detailed description",
      "currentUse": "current use description",
      "potential": "greening potential description"
    }}
  ]
}}

Focus on:
- Vacant lots and unused spaces
- Rooftops suitable for green roofs
- Underutilized parking areas
- Street medians and sidewalks
- Areas with good sun exposure and accessibility

Every site must lie within the search radius."#,
        lat = center.lat,
        lng = center.lng,
        radius = request.radius,
        area_type = request.area_type,
    );

    CompletionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Returns the outermost `{...}` span of `text`, ignoring any surrounding
/// prose or code fences.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Great-circle distance in meters between a site and the search centre.
fn distance_from_center(site: &CandidateSite, request: &DetectionRequest) -> f64 {
    let center = Point::new(request.coordinates.lng, request.coordinates.lat);
    let location = Point::new(site.coordinates.lng, site.coordinates.lat);
    Haversine.distance(center, location)
}

fn check_site(site: &CandidateSite, request: &DetectionRequest) -> Result<(), String> {
    if site.id.trim().is_empty() {
        return Err("empty id".to_string());
    }
    if !site.area.is_finite() || site.area <= 0.0 {
        return Err(format!("non-positive area {}", site.area));
    }
    if !(0.0..=1.0).contains(&site.confidence) {
        return Err(format!("confidence {} outside [0, 1]", site.confidence));
    }
    if !site.coordinates.is_valid() {
        return Err(format!(
            "invalid coordinates [{}, {}]",
            site.coordinates.lng, site.coordinates.lat
        ));
    }

    let max_distance = request.radius.max(MIN_VALIDATION_RADIUS_M) * MAX_DISTANCE_FACTOR;
    let distance = distance_from_center(site, request);
    if distance > max_distance {
        return Err(format!(
            "{distance:.0}m from the search centre, limit is {max_distance:.0}m"
        ));
    }

    Ok(())
}

/// Parses and validates generated detection output.
///
/// Sites that fail to deserialize or validate are dropped with a warning,
/// as is any site repeating the id of an earlier accepted one. Accepted sites always carry [`SiteFeatures::PLACEHOLDER`].
///
/// # Errors
///
/// Returns [`AiError::UpstreamUnavailable`] if the text holds no
/// `{"sites": [...]}` document or no site survives validation.
pub fn parse_detected_sites(
    text: &str,
    request: &DetectionRequest,
) -> Result<Vec<CandidateSite>, AiError> {
    let json = extract_json_object(text)
        .ok_or_else(|| AiError::unavailable("generator reply contains no JSON object"))?;
    let generated: GeneratedSites = serde_json::from_str(json).map_err(|e| {
        AiError::unavailable(format!("generator reply is not a sites document: {e}"))
    })?;

    let total = generated.sites.len();
    let mut seen = BTreeSet::new();
    let sites: Vec<CandidateSite> = generated
        .sites
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let mut site: CandidateSite = match serde_json::from_value(value) {
                Ok(site) => site,
                Err(e) => {
                    log::warn!("Dropping generated site #{i}: {e}");
                    return None;
                }
            };
            if let Err(reason) = check_site(&site, request) {
                log::warn!("Dropping generated site {}: {reason}", site.id);
                return None;
            }
            if !seen.insert(site.id.clone()) {
                log::warn!("Dropping generated site {}: duplicate id", site.id);
                return None;
            }
            site.features = SiteFeatures::PLACEHOLDER;
            Some(site)
        })
        .collect();

    if sites.is_empty() {
        return Err(AiError::unavailable(format!(
            "none of the {total} generated sites passed validation"
        )));
    }

    log::debug!("Accepted {} of {total} generated sites", sites.len());
    Ok(sites)
}

/// Deterministic stand-in sites used when the generator is unavailable.
#[must_use]
pub fn fallback_sites(request: &DetectionRequest) -> Vec<CandidateSite> {
    let center = request.coordinates;
    vec![
        CandidateSite {
            id: "fallback-1".to_string(),
            coordinates: center.offset(0.001, 0.001),
            area: 100.0,
            confidence: 0.9,
            site_type: SiteType::VacantLot,
            description: "Vacant lot with good potential for community greening".to_string(),
            current_use: "Unused space".to_string(),
            potential: "Community garden with native plants".to_string(),
            features: SiteFeatures::PLACEHOLDER,
        },
        CandidateSite {
            id: "fallback-2".to_string(),
            coordinates: center.offset(-0.001, 0.001),
            area: 80.0,
            confidence: 0.875,
            site_type: SiteType::Rooftop,
            description: "Flat rooftop space suitable for green roof installation".to_string(),
            current_use: "Unused rooftop".to_string(),
            potential: "Urban farming and air quality improvement".to_string(),
            features: SiteFeatures::PLACEHOLDER,
        },
    ]
}

/// Asks the generator for candidate sites and validates its reply.
///
/// # Errors
///
/// Returns the provider's error if the request fails, or
/// [`AiError::UpstreamUnavailable`] if the reply is unusable.
pub async fn detect_with_generator(
    provider: &dyn LlmProvider,
    request: &DetectionRequest,
) -> Result<Vec<CandidateSite>, AiError> {
    let text = provider.complete(&detection_prompt(request)).await?;
    parse_detected_sites(&text, request)
}

/// Detects sites with the generator, substituting [`fallback_sites`] if
/// there is no provider or the generator fails.
pub async fn detect_sites_or_fallback(
    provider: Option<&dyn LlmProvider>,
    request: &DetectionRequest,
) -> Vec<CandidateSite> {
    let Some(provider) = provider else {
        log::info!("No AI provider configured, using fallback sites");
        return fallback_sites(request);
    };

    match detect_with_generator(provider, request).await {
        Ok(sites) => sites,
        Err(e) => {
            log::warn!(
                "Site detection via {} failed, using fallback sites: {e}",
                provider.name()
            );
            fallback_sites(request)
        }
    }
}

/// Runs a detection request with the given method.
///
/// Heuristic results are the top-scoring local candidates. Generator results
/// never fail: they fall back to [`fallback_sites`]. Hybrid detection
/// merges both, highest confidence first.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidInput`] if the request or weights are
/// invalid.
pub async fn detect(
    method: DetectionMethod,
    provider: Option<&dyn LlmProvider>,
    request: &DetectionRequest,
    weights: &ScoringWeights,
) -> Result<Vec<CandidateSite>, ScoringError> {
    heuristics::validate_request(request)?;
    log::debug!("Detecting sites with method {method}");

    match method {
        DetectionMethod::SmartHeuristics => heuristics::detect_sites(request, weights),
        DetectionMethod::OpenaiVision => Ok(detect_sites_or_fallback(provider, request).await),
        DetectionMethod::Hybrid => {
            let local = heuristics::detect_sites(request, weights)?;
            let generated = detect_sites_or_fallback(provider, request).await;
            Ok(heuristics::merge_by_confidence(local, generated))
        }
    }
}

#[cfg(test)]
mod tests {
    use green_map_site_models::{AreaType, LngLat};

    use super::*;
    use crate::providers::testing::ScriptedProvider;

    fn request() -> DetectionRequest {
        DetectionRequest {
            coordinates: LngLat::new(100.5018, 13.7563),
            radius: 1000.0,
            area_type: AreaType::Urban,
        }
    }

    fn site_json(id: &str, lng: f64, lat: f64, area: f64, confidence: f64, site_type: &str) -> String {
        format!(
            r#"{{"id":"{id}","coordinates":[{lng},{lat}],"area":{area},"confidence":{confidence},"siteType":"{site_type}","description":"d","currentUse":"c","potential":"p"}}"#
        )
    }

    fn ids(sites: &[CandidateSite]) -> Vec<&str> {
        sites.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn prompt_mentions_search_area() {
        let prompt = detection_prompt(&request());
        assert!(prompt.prompt.contains("latitude 13.7563, longitude 100.5018"));
        assert!(prompt.prompt.contains("radius of 1000m in a urban setting"));
        assert!(
            prompt
                .prompt
                .contains("vacant_lot|rooftop|parking_lot|median|sidewalk")
        );
        assert_eq!(prompt.max_tokens, 1000);
    }

    #[test]
    fn extracts_json_from_prose_and_fences() {
        let text = "Here you go:\n```json\n{\"sites\": []}\n```\nHope that helps.";
        assert_eq!(extract_json_object(text), Some("{\"sites\": []}"));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn accepts_valid_sites() {
        let text = format!(
            r#"{{"sites":[{},{}]}}"#,
            site_json("a", 100.503, 13.757, 150.0, 0.8, "vacant_lot"),
            site_json("b", 100.500, 13.755, 60.0, 1.0, "rooftop"),
        );
        let sites = parse_detected_sites(&text, &request()).unwrap();
        assert_eq!(ids(&sites), ["a", "b"]);
        assert_eq!(sites[1].site_type, SiteType::Rooftop);
        assert_eq!(sites[0].features, SiteFeatures::PLACEHOLDER);
    }

    #[test]
    fn drops_malformed_sites() {
        let text = format!(
            r#"{{"sites":[{},{},{},{},{},{}]}}"#,
            site_json("good", 100.503, 13.757, 150.0, 0.8, "median"),
            site_json("unknown-type", 100.503, 13.757, 150.0, 0.8, "swimming_pool"),
            site_json("zero-area", 100.503, 13.757, 0.0, 0.8, "median"),
            site_json("overconfident", 100.503, 13.757, 50.0, 1.4, "median"),
            site_json("far-away", -73.98, 40.75, 50.0, 0.8, "median"),
            r#"{"id":"missing-fields"}"#,
        );
        let sites = parse_detected_sites(&text, &request()).unwrap();
        assert_eq!(ids(&sites), ["good"]);
    }

    #[test]
    fn drops_repeated_ids() {
        let text = format!(
            r#"{{"sites":[{},{},{}]}}"#,
            site_json("dup", 100.503, 13.757, 150.0, 0.8, "median"),
            site_json("dup", 100.500, 13.755, 60.0, 0.9, "rooftop"),
            site_json("other", 100.500, 13.755, 60.0, 0.7, "rooftop"),
        );
        let sites = parse_detected_sites(&text, &request()).unwrap();
        assert_eq!(ids(&sites), ["dup", "other"]);
        assert_eq!(sites[0].site_type, SiteType::Median);
    }

    #[test]
    fn small_radius_still_allows_two_kilometers() {
        let mut req = request();
        req.radius = 50.0;
        // About 1.1km north of the centre.
        let text = format!(
            r#"{{"sites":[{}]}}"#,
            site_json("near", 100.5018, 13.7663, 80.0, 0.7, "sidewalk")
        );
        assert_eq!(parse_detected_sites(&text, &req).unwrap().len(), 1);

        // About 3.3km north of the centre.
        let text = format!(
            r#"{{"sites":[{}]}}"#,
            site_json("far", 100.5018, 13.7863, 80.0, 0.7, "sidewalk")
        );
        assert!(parse_detected_sites(&text, &req).is_err());
    }

    #[test]
    fn unusable_replies_are_upstream_errors() {
        for text in [
            "I cannot help with that.",
            r#"{"locations": []}"#,
            r#"{"sites": []}"#,
            r#"{"sites": [{"id": "x"}]}"#,
        ] {
            assert!(matches!(
                parse_detected_sites(text, &request()),
                Err(AiError::UpstreamUnavailable { .. })
            ));
        }
    }

    #[test]
    fn fallback_sites_are_deterministic() {
        let sites = fallback_sites(&request());
        assert_eq!(ids(&sites), ["fallback-1", "fallback-2"]);
        assert_eq!(sites[0].coordinates, LngLat::new(100.5018 + 0.001, 13.7563 + 0.001));
        assert_eq!(sites[1].coordinates, LngLat::new(100.5018 - 0.001, 13.7563 + 0.001));
        assert_eq!(sites[1].site_type, SiteType::Rooftop);
        assert_eq!(sites, fallback_sites(&request()));
    }

    #[tokio::test]
    async fn falls_back_without_provider() {
        let sites = detect_sites_or_fallback(None, &request()).await;
        assert_eq!(sites, fallback_sites(&request()));
    }

    #[tokio::test]
    async fn falls_back_on_provider_error() {
        let provider = ScriptedProvider::failing();
        let sites = detect_sites_or_fallback(Some(&provider), &request()).await;
        assert_eq!(ids(&sites), ["fallback-1", "fallback-2"]);
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_on_garbage() {
        let provider = ScriptedProvider::replying("Sorry, I can't see satellite images.");
        let sites = detect_sites_or_fallback(Some(&provider), &request()).await;
        assert_eq!(ids(&sites), ["fallback-1", "fallback-2"]);
    }

    #[tokio::test]
    async fn uses_validated_generator_output() {
        let text = format!(
            "```json\n{{\"sites\":[{}]}}\n```",
            site_json("gen-1", 100.502, 13.757, 200.0, 0.95, "parking_lot")
        );
        let provider = ScriptedProvider::replying(&text);
        let sites = detect_sites_or_fallback(Some(&provider), &request()).await;
        assert_eq!(ids(&sites), ["gen-1"]);
    }

    #[tokio::test]
    async fn heuristic_method_ignores_provider() {
        let provider = ScriptedProvider::failing();
        let sites = detect(
            DetectionMethod::SmartHeuristics,
            Some(&provider),
            &request(),
            &ScoringWeights::default(),
        )
        .await
        .unwrap();
        assert_eq!(ids(&sites), ["heuristics-2", "heuristics-1", "heuristics-3"]);
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn hybrid_merges_by_confidence() {
        let sites = detect(
            DetectionMethod::Hybrid,
            None,
            &request(),
            &ScoringWeights::default(),
        )
        .await
        .unwrap();
        // heuristics-1 .92, fallback-1 .90, heuristics-2 .88,
        // fallback-2 .875, heuristics-3 .85
        assert_eq!(
            ids(&sites),
            ["heuristics-1", "fallback-1", "heuristics-2", "fallback-2", "heuristics-3"]
        );
    }

    #[tokio::test]
    async fn hybrid_drops_generated_sites_colliding_with_heuristics() {
        let text = format!(
            r#"{{"sites":[{},{}]}}"#,
            site_json("heuristics-1", 100.502, 13.757, 200.0, 0.99, "parking_lot"),
            site_json("gen-1", 100.502, 13.757, 200.0, 0.95, "parking_lot"),
        );
        let provider = ScriptedProvider::replying(&text);
        let sites = detect(
            DetectionMethod::Hybrid,
            Some(&provider),
            &request(),
            &ScoringWeights::default(),
        )
        .await
        .unwrap();
        assert_eq!(
            ids(&sites),
            ["gen-1", "heuristics-1", "heuristics-2", "heuristics-3"]
        );
        assert_eq!(sites[1].site_type, SiteType::VacantLot);
    }

    #[tokio::test]
    async fn rejects_invalid_requests_for_every_method() {
        let mut bad = request();
        bad.radius = -1.0;
        for method in [
            DetectionMethod::SmartHeuristics,
            DetectionMethod::OpenaiVision,
            DetectionMethod::Hybrid,
        ] {
            assert!(
                detect(method, None, &bad, &ScoringWeights::default())
                    .await
                    .is_err()
            );
        }
    }
}
