#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Native plant reference record types.
//!
//! [`Plant`] records are read-only reference data loaded once at startup.
//! Their per-plant coefficients feed the impact model.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Growth form of a plant.
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
pub enum PlantType {
    /// Woody plant with a single trunk.
    Tree,
    /// Woody plant with multiple stems.
    Shrub,
    /// Non-woody plant, often culinary or medicinal.
    Herb,
    /// Ornamental flowering plant.
    Flower,
    /// Climbing or trailing plant.
    Vine,
}

impl PlantType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Tree,
            Self::Shrub,
            Self::Herb,
            Self::Flower,
            Self::Vine,
        ]
    }
}

/// Watering requirement.
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
pub enum WaterNeeds {
    /// Drought tolerant.
    Low,
    /// Regular watering.
    Medium,
    /// Moist soil required.
    High,
}

/// Preferred sun exposure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SunExposure {
    /// Six or more hours of direct sun.
    Full,
    /// Some direct sun.
    Partial,
    /// Little or no direct sun.
    Shade,
}

/// Size of a plant at maturity, as display ranges (e.g. `"6-8m"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatureSize {
    /// Height range.
    pub height: String,
    /// Spread range.
    pub width: String,
}

/// A native plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Unique identifier (e.g. `"neem"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Binomial name.
    pub scientific_name: String,
    /// Growth form.
    #[serde(rename = "type")]
    pub plant_type: PlantType,
    /// Regions the species is native to.
    #[serde(default)]
    pub native_to: Vec<String>,
    /// Notable benefits.
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Watering requirement.
    pub water_needs: WaterNeeds,
    /// Preferred sun exposure.
    pub sun_exposure: SunExposure,
    /// Size at maturity.
    pub mature_size: MatureSize,
    /// When the plant flowers, if it does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowering_season: Option<String>,
    /// Pollinator species the plant attracts.
    #[serde(default)]
    pub pollinator_attraction: Vec<String>,
    /// CO₂ sequestered per plant, kg per year.
    pub co2_sequestration: f64,
    /// Stormwater intercepted per plant, liters per year.
    pub stormwater_reduction: f64,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Plant {
    /// Whether both impact coefficients are finite and non-negative.
    #[must_use]
    pub fn has_valid_coefficients(&self) -> bool {
        [self.co2_sequestration, self.stormwater_reduction]
            .iter()
            .all(|c| c.is_finite() && *c >= 0.0)
    }
}
