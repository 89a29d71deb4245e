//! Free-form planting advice from the generator.
//!
//! Unlike detection and proposals there is no local substitute for this
//! advice, so upstream failures are returned to the caller.

use green_map_site_models::SiteKind;
use serde::{Deserialize, Serialize};

use crate::providers::{CompletionRequest, LlmProvider};
use crate::{AiError, section_or, split_sections};

const SYSTEM_PROMPT: &str = "You are an expert urban ecologist and landscape designer \
specializing in tropical climates and community greening projects.";

const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.7;

const DEFAULT_RATIONALE: &str =
    "Plants selected for their suitability to the local climate and ecological benefits.";
const DEFAULT_MAINTENANCE: &str =
    "Regular watering during dry season, occasional pruning, and seasonal mulching.";
const DEFAULT_TIMELINE: &str =
    "Implementation can begin immediately with proper site preparation and plant sourcing.";

/// Input for a planting recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Free-text description of the site.
    pub site_description: String,
    /// Site area in m².
    pub area: f64,
    /// Planting context.
    pub site_type: SiteKind,
    /// Where the site is. Empty means the server's configured location.
    #[serde(default)]
    pub location: String,
    /// What the community wants from the site.
    #[serde(default)]
    pub goals: Vec<String>,
}

impl RecommendationRequest {
    /// Checks that the description and location are present and the area is
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::InvalidInput`] describing the first bad field.
    pub fn validate(&self) -> Result<(), AiError> {
        if self.site_description.trim().is_empty() {
            return Err(AiError::invalid("missing required field siteDescription"));
        }
        if self.location.trim().is_empty() {
            return Err(AiError::invalid("missing required field location"));
        }
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(AiError::invalid(format!(
                "area must be positive, got {}",
                self.area
            )));
        }
        Ok(())
    }
}

/// Generated planting advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Suggested species.
    pub recommendations: String,
    /// Why they were chosen.
    pub rationale: String,
    /// Upkeep requirements.
    pub maintenance: String,
    /// Implementation timeline.
    pub timeline: String,
}

/// Builds the completion request for planting advice.
#[must_use]
pub fn recommendation_prompt(request: &RecommendationRequest) -> CompletionRequest {
    let goals = if request.goals.is_empty() {
        "General greening".to_string()
    } else {
        request.goals.join(", ")
    };

    let prompt = format!(
        "You are an expert urban ecologist and landscape designer specializing in tropical climates, particularly Thailand and Southeast Asia.

Site Details:
- Location: {location}
- Area: {area} square meters
- Site Type: {site_type}
- Description: {description}
- Goals: {goals}

Please provide a comprehensive plant recommendation as four paragraphs separated by blank lines:

1. Specific native plant species suitable for this site
2. Rationale for plant selection (considering climate, soil, maintenance, and ecological benefits)
3. Basic maintenance requirements
4. Implementation timeline

Focus on:
- Native plants that thrive in the local climate
- Plants that support local biodiversity and pollinators
- Low-maintenance options suitable for community gardens
- Plants that provide multiple benefits (air purification, stormwater management, aesthetic value)

Keep the response practical and actionable for community groups.",
        location = request.location,
        area = request.area,
        site_type = request.site_type,
        description = request.site_description,
    );

    CompletionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Parses generated text into recommendations.
///
/// The first paragraph is the recommendation itself; the next three are
/// rationale, maintenance and timeline, each with stock text when missing.
///
/// # Errors
///
/// Returns [`AiError::UpstreamUnavailable`] if the text is blank.
pub fn parse_recommendations(text: &str) -> Result<Recommendations, AiError> {
    let sections = split_sections(text);
    let Some(first) = sections.first() else {
        return Err(AiError::unavailable(
            "generator returned empty recommendations",
        ));
    };

    Ok(Recommendations {
        recommendations: first.clone(),
        rationale: section_or(&sections, 1, DEFAULT_RATIONALE),
        maintenance: section_or(&sections, 2, DEFAULT_MAINTENANCE),
        timeline: section_or(&sections, 3, DEFAULT_TIMELINE),
    })
}

/// Asks the generator for planting advice.
///
/// # Errors
///
/// Returns [`AiError::InvalidInput`] for an invalid request, the provider's
/// error if the request fails, or [`AiError::UpstreamUnavailable`] if the
/// reply is blank.
pub async fn generate_recommendations(
    provider: &dyn LlmProvider,
    request: &RecommendationRequest,
) -> Result<Recommendations, AiError> {
    request.validate()?;
    let text = provider
        .complete(&recommendation_prompt(request))
        .await?;
    parse_recommendations(&text)
}
