//! Environmental impact aggregation.

use std::collections::BTreeSet;

use green_map_impact_models::{
    AirQualityImprovement, BiodiversityLevel, BiodiversitySupport, Co2Sequestration,
    ImpactMetrics, PlantingPlan, StormwaterReduction,
};
use green_map_plant_models::PlantType;

use crate::ImpactError;

/// Rough CO₂ emitted per mile driven by an average passenger car, in kg.
pub const KG_CO2_PER_CAR_MILE: f64 = 0.4;

/// Car-mile counts above this are rendered in thousands.
const THOUSANDS_THRESHOLD: u64 = 1000;

/// Distinct pollinators needed, along with trees, flowers and herbs, for
/// [`BiodiversityLevel::High`].
pub const HIGH_BIODIVERSITY_POLLINATORS: usize = 4;

/// Distinct pollinators that alone earn [`BiodiversityLevel::Medium`].
pub const MEDIUM_BIODIVERSITY_POLLINATORS: usize = 3;

/// Pollutants every planting is credited with filtering.
pub const POLLUTANTS_REDUCED: [&str; 4] = ["PM2.5", "NOx", "Ozone", "CO2"];

const AIR_QUALITY_WITH_TREES: &str = "Trees and plants will filter air pollutants including PM2.5, NOx, and ozone, improving local air quality.";
const AIR_QUALITY_WITHOUT_TREES: &str =
    "Plants will help filter air pollutants and improve local air quality.";

/// Plant-type mix of a plan.
#[derive(Debug, Default, Clone, Copy)]
struct TypeMix {
    trees: bool,
    flowers: bool,
    herbs: bool,
}

impl TypeMix {
    fn record(&mut self, plant_type: PlantType) {
        match plant_type {
            PlantType::Tree => self.trees = true,
            PlantType::Herb => {
                self.flowers = true;
                self.herbs = true;
            }
            PlantType::Flower => self.flowers = true,
            PlantType::Shrub | PlantType::Vine => {}
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u64(value: f64) -> u64 {
    value.round() as u64
}

/// Classifies biodiversity support; the first matching rule wins.
fn biodiversity_level(mix: TypeMix, pollinators: usize) -> BiodiversityLevel {
    if mix.trees && mix.flowers && mix.herbs && pollinators >= HIGH_BIODIVERSITY_POLLINATORS {
        BiodiversityLevel::High
    } else if (mix.trees && mix.flowers) || pollinators >= MEDIUM_BIODIVERSITY_POLLINATORS {
        BiodiversityLevel::Medium
    } else {
        BiodiversityLevel::Low
    }
}

const fn biodiversity_description(level: BiodiversityLevel) -> &'static str {
    match level {
        BiodiversityLevel::High => {
            "Excellent biodiversity support with diverse plant types and multiple pollinator species"
        }
        BiodiversityLevel::Medium => {
            "Good biodiversity support with mixed plant types and several pollinator species"
        }
        BiodiversityLevel::Low => "Basic biodiversity support with limited plant diversity",
    }
}

/// Renders annual CO₂ as an equivalent distance of car travel.
#[must_use]
pub fn car_travel_equivalent(co2_kg_per_year: f64) -> String {
    let car_miles = round_to_u64(co2_kg_per_year / KG_CO2_PER_CAR_MILE);
    if car_miles > THOUSANDS_THRESHOLD {
        #[allow(clippy::cast_precision_loss)]
        let thousands = round_to_u64(car_miles as f64 / 1000.0);
        format!("{thousands}k miles of car travel")
    } else {
        format!("{car_miles} miles of car travel")
    }
}

/// Aggregates a planting plan into impact metrics.
///
/// Stormwater and CO₂ totals are summed exactly and rounded once at the
/// end.
///
/// # Errors
///
/// Returns [`ImpactError::InvalidInput`] if an entry has a zero quantity
/// or a plant has a negative or non-finite coefficient.
pub fn compute_impact(plan: &PlantingPlan) -> Result<ImpactMetrics, ImpactError> {
    let mut stormwater = 0.0;
    let mut co2 = 0.0;
    let mut pollinators: BTreeSet<&str> = BTreeSet::new();
    let mut mix = TypeMix::default();

    for entry in &plan.plants {
        let plant = &entry.plant;
        if entry.quantity == 0 {
            return Err(ImpactError::invalid(format!(
                "plant {} has quantity 0",
                plant.id
            )));
        }
        if !plant.has_valid_coefficients() {
            return Err(ImpactError::invalid(format!(
                "plant {} has a negative or non-finite impact coefficient",
                plant.id
            )));
        }

        let quantity = f64::from(entry.quantity);
        stormwater += plant.stormwater_reduction * quantity;
        co2 += plant.co2_sequestration * quantity;
        pollinators.extend(plant.pollinator_attraction.iter().map(String::as_str));
        mix.record(plant.plant_type);
    }

    let liters_per_year = round_to_u64(stormwater);
    let level = biodiversity_level(mix, pollinators.len());

    log::debug!(
        "Impact of {} plan entries: {liters_per_year} L/yr stormwater, {co2:.1} kg/yr CO2, \
         {} pollinators, {level} biodiversity",
        plan.plants.len(),
        pollinators.len()
    );

    Ok(ImpactMetrics {
        stormwater_reduction: StormwaterReduction {
            liters_per_year,
            description: format!(
                "This garden can absorb approximately {liters_per_year} liters of stormwater \
                 per year, helping reduce local flooding and improving water quality."
            ),
        },
        co2_sequestration: Co2Sequestration {
            kg_per_year: round_to_u64(co2),
            equivalent: car_travel_equivalent(co2),
        },
        biodiversity_support: BiodiversitySupport {
            level,
            description: biodiversity_description(level).to_string(),
            pollinator_species: pollinators.len(),
        },
        air_quality_improvement: AirQualityImprovement {
            description: if mix.trees {
                AIR_QUALITY_WITH_TREES
            } else {
                AIR_QUALITY_WITHOUT_TREES
            }
            .to_string(),
            pollutants_reduced: POLLUTANTS_REDUCED.iter().map(ToString::to_string).collect(),
        },
    })
}
