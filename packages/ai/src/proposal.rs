//! Community proposal generation.

use chrono::{DateTime, Utc};
use green_map_impact_models::{BiodiversityLevel, ImpactMetrics, PlantingPlan};
use serde::{Deserialize, Serialize};

use crate::providers::{CompletionRequest, LlmProvider};
use crate::{AiError, section_or, split_sections};

/// Location used when a request does not name one.
pub const DEFAULT_LOCATION: &str = "Bangkok, Thailand";

const SYSTEM_PROMPT: &str = "You are a professional urban planning consultant and community \
engagement specialist writing project proposals for urban greening initiatives.";

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

const DEFAULT_INTRODUCTION: &str = "This proposal outlines a plan to transform an underutilized \
urban space into a thriving community garden.";
const DEFAULT_BENEFITS: &str =
    "The project will provide environmental, social, and economic benefits to the community.";
const DEFAULT_IMPLEMENTATION: &str =
    "Implementation will proceed in phases with community involvement at each step.";
const DEFAULT_NEXT_STEPS: &str = "Next steps include securing permissions, sourcing materials, \
and organizing community volunteers.";
const DEFAULT_CONCLUSION: &str =
    "This project represents an opportunity to create lasting positive change in our community.";

/// The headline figures quoted in a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalImpact {
    /// Stormwater reduction, liters per year.
    pub stormwater: u64,
    /// CO₂ sequestration, kg per year.
    pub co2: u64,
    /// Biodiversity support level.
    pub biodiversity: BiodiversityLevel,
}

impl From<&ImpactMetrics> for ProposalImpact {
    fn from(metrics: &ImpactMetrics) -> Self {
        Self {
            stormwater: metrics.stormwater_reduction.liters_per_year,
            co2: metrics.co2_sequestration.kg_per_year,
            biodiversity: metrics.biodiversity_support.level,
        }
    }
}

/// Input for a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    /// Display name of the site.
    pub site_name: String,
    /// Free-text description of the site.
    pub site_description: String,
    /// Flattened plant plan, see [`PlantingPlan::summary`].
    pub plant_plan: String,
    /// Headline impact figures.
    pub impact_metrics: ProposalImpact,
    /// Where the site is. Empty means the server's configured location.
    #[serde(default)]
    pub location: String,
}

impl ProposalRequest {
    /// Builds a request from a computed plan and its impact.
    #[must_use]
    pub fn from_plan(
        site_name: impl Into<String>,
        site_description: impl Into<String>,
        plan: &PlantingPlan,
        impact: &ImpactMetrics,
        location: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_description: site_description.into(),
            plant_plan: plan.summary(),
            impact_metrics: impact.into(),
            location: location.into(),
        }
    }

    /// Checks that the site name, description and location are present.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::InvalidInput`] naming the first missing field.
    pub fn validate(&self) -> Result<(), AiError> {
        for (name, value) in [
            ("siteName", &self.site_name),
            ("siteDescription", &self.site_description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(AiError::invalid(format!("missing required field {name}")));
            }
        }
        Ok(())
    }
}

/// A generated community proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Plain-text title.
    pub title: String,
    /// Why the project matters.
    pub introduction: String,
    /// Environmental and community benefits.
    pub benefits: String,
    /// Practical implementation plan.
    pub implementation: String,
    /// What happens next.
    pub next_steps: String,
    /// Closing statement.
    pub conclusion: String,
    /// When the proposal was produced.
    pub generated_at: DateTime<Utc>,
}

fn default_title(site_name: &str) -> String {
    format!("{site_name} Community Greening Project")
}

/// Builds the completion request for a proposal.
#[must_use]
pub fn proposal_prompt(request: &ProposalRequest) -> CompletionRequest {
    let impact = &request.impact_metrics;
    let prompt = format!(
        "You are writing a community greening project proposal for urban planners and community groups.

Project Details:
- Site Name: {site_name}
- Location: {location}
- Site Description: {site_description}
- Plant Plan: {plant_plan}
- Environmental Impact:
  - Stormwater Reduction: {stormwater} liters per year
  - CO2 Sequestration: {co2} kg per year
  - Biodiversity Support: {biodiversity}

Please create a compelling proposal that includes, each as its own paragraph separated by a blank line:

1. A compelling title (just the title text, no formatting)
2. An engaging introduction explaining the project's importance
3. A benefits section highlighting environmental and community benefits
4. An implementation plan with practical steps
5. Next steps for moving forward
6. A strong conclusion

IMPORTANT: For the title, provide ONLY the title text without any markdown formatting, prefixes like \"Title:\", or special characters.

The tone should be professional yet accessible, suitable for presenting to community groups, city officials, or potential funders. Emphasize the environmental benefits, community engagement opportunities, and alignment with sustainable development goals.

Keep each section concise but impactful.",
        site_name = request.site_name,
        location = request.location,
        site_description = request.site_description,
        plant_plan = request.plant_plan,
        stormwater = impact.stormwater,
        co2 = impact.co2,
        biodiversity = impact.biodiversity,
    );

    CompletionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Strips markdown heading markers, a leading `**Label**:` prefix and any
/// remaining `**` from a generated title.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.trim_start_matches('#').trim_start();

    if let Some(rest) = title.strip_prefix("**") {
        let first_line = rest.lines().next().unwrap_or_default();
        if let Some(end) = first_line.find("**:") {
            title = rest[end + 3..].trim_start();
        }
    }

    title.replace("**", "").trim().to_string()
}

/// Parses generated text into a proposal.
///
/// Paragraphs map to title, introduction, benefits, implementation, next
/// steps and conclusion in order; missing ones get stock text.
#[must_use]
pub fn parse_proposal(text: &str, request: &ProposalRequest) -> Proposal {
    let sections = split_sections(text);

    let title = sections
        .first()
        .map(|s| clean_title(s))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| default_title(&request.site_name));

    Proposal {
        title,
        introduction: section_or(&sections, 1, DEFAULT_INTRODUCTION),
        benefits: section_or(&sections, 2, DEFAULT_BENEFITS),
        implementation: section_or(&sections, 3, DEFAULT_IMPLEMENTATION),
        next_steps: section_or(&sections, 4, DEFAULT_NEXT_STEPS),
        conclusion: section_or(&sections, 5, DEFAULT_CONCLUSION),
        generated_at: Utc::now(),
    }
}

/// Builds a proposal locally from the request alone.
#[must_use]
pub fn fallback_proposal(request: &ProposalRequest) -> Proposal {
    let impact = &request.impact_metrics;
    Proposal {
        title: default_title(&request.site_name),
        introduction: format!(
            "This proposal outlines a plan to transform {} into a thriving community garden \
             that will provide environmental, social, and economic benefits to the local \
             community.",
            request.site_name
        ),
        benefits: format!(
            "The project will reduce stormwater runoff by {} liters annually, sequester {} kg \
             of CO₂, and support local biodiversity.",
            impact.stormwater, impact.co2
        ),
        implementation: "Implementation will proceed in phases with community involvement at \
                         each step, including site preparation, plant installation, and \
                         ongoing maintenance."
            .to_string(),
        next_steps: "Next steps include securing permissions from local authorities, sourcing \
                     plants and materials, and organizing community volunteers."
            .to_string(),
        conclusion: "This project represents an opportunity to create lasting positive change \
                     in our community while contributing to urban sustainability goals."
            .to_string(),
        generated_at: Utc::now(),
    }
}

/// Generates a proposal with the given provider.
///
/// # Errors
///
/// Returns [`AiError::InvalidInput`] for an invalid request, the provider's
/// error if the request fails, or [`AiError::UpstreamUnavailable`] if the
/// generator returns no text.
pub async fn generate_proposal(
    provider: &dyn LlmProvider,
    request: &ProposalRequest,
) -> Result<Proposal, AiError> {
    request.validate()?;
    let text = provider.complete(&proposal_prompt(request)).await?;
    if text.trim().is_empty() {
        return Err(AiError::unavailable("generator returned an empty proposal"));
    }
    Ok(parse_proposal(&text, request))
}

/// Generates a proposal, substituting [`fallback_proposal`] if there is no
/// provider or the generator fails.
///
/// # Errors
///
/// Returns [`AiError::InvalidInput`] for an invalid request. Upstream
/// failures never surface.
pub async fn generate_proposal_or_fallback(
    provider: Option<&dyn LlmProvider>,
    request: &ProposalRequest,
) -> Result<Proposal, AiError> {
    request.validate()?;

    let Some(provider) = provider else {
        log::info!("No AI provider configured, using fallback proposal");
        return Ok(fallback_proposal(request));
    };

    match generate_proposal(provider, request).await {
        Ok(proposal) => Ok(proposal),
        Err(e) => {
            log::warn!(
                "Proposal generation via {} failed, using fallback: {e}",
                provider.name()
            );
            Ok(fallback_proposal(request))
        }
    }
}
