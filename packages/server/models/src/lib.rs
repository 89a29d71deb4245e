#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the green map server.
//!
//! These types are serialized to JSON for the REST API. Domain types are
//! reused directly where their wire shape already matches the API contract.

use green_map_impact_models::{ImpactMetrics, PlantingPlan};
use green_map_plant_models::PlantType;
use green_map_site_models::{CandidateSite, DetectionMethod, DetectionRequest, SiteKind};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters for the plants endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantQueryParams {
    /// Only return plants of this type.
    #[serde(rename = "type")]
    pub plant_type: Option<PlantType>,
}

/// Body of a site detection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetectionRequest {
    /// Detection method.
    pub method: DetectionMethod,
    /// Search parameters.
    pub request: DetectionRequest,
}

/// Detected sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetectionResponse {
    /// Candidate sites, best first.
    pub sites: Vec<CandidateSite>,
}

/// Body of a planting plan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlanRequest {
    /// Site area in m².
    pub area: f64,
    /// Candidate site type, or `ground`/`rooftop`.
    pub site_type: SiteKind,
}

/// A planting plan and its impact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlanResponse {
    /// The generated plan.
    pub plan: PlantingPlan,
    /// Impact of the plan.
    pub impact: ImpactMetrics,
}
