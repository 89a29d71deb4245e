#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planting plan and impact metric types.
//!
//! A [`PlantingPlan`] assigns species and quantities to a site.
//! [`ImpactMetrics`] are wholly derived from a plan and have no identity
//! beyond the request that produced them.

use green_map_plant_models::Plant;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One species in a planting plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// The species.
    pub plant: Plant,
    /// Number of individuals. At least 1 in a well-formed plan.
    pub quantity: u32,
}

/// An ordered assignment of species and quantities to a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingPlan {
    /// Entries in allocation order.
    pub plants: Vec<PlanEntry>,
    /// Site area the plan was derived from, in m².
    pub total_area: f64,
}

impl PlantingPlan {
    /// Flattens the plan to `"{qty} x {name} ({scientific name})"` items
    /// joined by `", "`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.plants
            .iter()
            .map(|entry| {
                format!(
                    "{} x {} ({})",
                    entry.quantity, entry.plant.name, entry.plant.scientific_name
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Total number of individual plants.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.plants.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

/// Qualitative biodiversity support level.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BiodiversityLevel {
    /// Limited plant diversity.
    Low,
    /// Mixed plant types or several pollinators.
    Medium,
    /// Trees, flowers and herbs with many pollinators.
    High,
}

/// Annual stormwater interception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StormwaterReduction {
    /// Liters per year, rounded.
    pub liters_per_year: u64,
    /// Narrative description.
    pub description: String,
}

/// Annual carbon sequestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Co2Sequestration {
    /// Kilograms per year, rounded.
    pub kg_per_year: u64,
    /// Car-travel equivalent, e.g. `"2k miles of car travel"`.
    pub equivalent: String,
}

/// Biodiversity assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodiversitySupport {
    /// Qualitative level.
    pub level: BiodiversityLevel,
    /// Narrative description.
    pub description: String,
    /// Number of distinct pollinator species attracted.
    pub pollinator_species: usize,
}

/// Air quality assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityImprovement {
    /// Narrative description.
    pub description: String,
    /// Pollutants filtered.
    pub pollutants_reduced: Vec<String>,
}

/// Aggregate environmental impact of a planting plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMetrics {
    /// Stormwater interception.
    pub stormwater_reduction: StormwaterReduction,
    /// Carbon sequestration.
    pub co2_sequestration: Co2Sequestration,
    /// Biodiversity assessment.
    pub biodiversity_support: BiodiversitySupport,
    /// Air quality assessment.
    pub air_quality_improvement: AirQualityImprovement,
}
