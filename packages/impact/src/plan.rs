//! Deterministic planting plan allocation.
//!
//! For each plant type a site kind supports, the first matching species in
//! the available list is planted at a density derived from the site area.
//! Types with no available species are skipped.

use green_map_impact_models::{PlanEntry, PlantingPlan};
use green_map_plant_models::{Plant, PlantType};
use green_map_site_models::SiteKind;

use crate::ImpactError;

/// Site area (m²) allotted to each tree.
pub const TREE_AREA_PER_PLANT: f64 = 50.0;
/// Site area (m²) allotted to each shrub.
pub const SHRUB_AREA_PER_PLANT: f64 = 25.0;
/// Site area (m²) allotted to each herb.
pub const HERB_AREA_PER_PLANT: f64 = 20.0;
/// Site area (m²) allotted to each flower.
pub const FLOWER_AREA_PER_PLANT: f64 = 15.0;
/// Site area (m²) allotted to each vine.
pub const VINE_AREA_PER_PLANT: f64 = 30.0;
/// Smallest ground site (m²) that gets trees.
pub const TREE_MIN_SITE_AREA: f64 = 100.0;
/// Most trees planted on any site.
pub const MAX_TREES: u32 = 3;
/// Largest site area (m²) a plan is generated for. Plant counts for any
/// area up to this fit comfortably in a `u32`.
pub const MAX_SITE_AREA: f64 = 10_000_000.0;

/// Plant types a site kind supports, in allocation order.
#[must_use]
pub const fn planting_order(kind: SiteKind) -> &'static [PlantType] {
    match kind {
        SiteKind::Rooftop => &[PlantType::Herb, PlantType::Flower, PlantType::Vine],
        SiteKind::Ground => &[
            PlantType::Tree,
            PlantType::Shrub,
            PlantType::Herb,
            PlantType::Flower,
        ],
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn plants_per_area(area: f64, area_per_plant: f64) -> u32 {
    (area / area_per_plant).floor() as u32
}

fn at_least_one(area: f64, area_per_plant: f64) -> u32 {
    plants_per_area(area, area_per_plant).max(1)
}

/// Number of plants of `plant_type` to put on a site, or `None` if the
/// site kind does not take that type.
#[must_use]
pub fn quantity_for(kind: SiteKind, plant_type: PlantType, area: f64) -> Option<u32> {
    match (kind, plant_type) {
        (SiteKind::Rooftop | SiteKind::Ground, PlantType::Herb) => {
            Some(at_least_one(area, HERB_AREA_PER_PLANT))
        }
        (SiteKind::Rooftop | SiteKind::Ground, PlantType::Flower) => {
            Some(at_least_one(area, FLOWER_AREA_PER_PLANT))
        }
        (SiteKind::Rooftop, PlantType::Vine) => Some(at_least_one(area, VINE_AREA_PER_PLANT)),
        (SiteKind::Rooftop, PlantType::Tree | PlantType::Shrub)
        | (SiteKind::Ground, PlantType::Vine) => None,
        (SiteKind::Ground, PlantType::Tree) => (area >= TREE_MIN_SITE_AREA)
            .then(|| plants_per_area(area, TREE_AREA_PER_PLANT).min(MAX_TREES)),
        (SiteKind::Ground, PlantType::Shrub) => Some(at_least_one(area, SHRUB_AREA_PER_PLANT)),
    }
}

/// Builds a planting plan for a site.
///
/// The plan is a pure function of its inputs.
///
/// # Errors
///
/// Returns [`ImpactError::InvalidInput`] if `area` is not a positive number
/// or exceeds [`MAX_SITE_AREA`].
pub fn generate_plan(
    area: f64,
    kind: SiteKind,
    available_plants: &[Plant],
) -> Result<PlantingPlan, ImpactError> {
    if !area.is_finite() || area <= 0.0 {
        return Err(ImpactError::invalid(format!(
            "site area must be positive, got {area}"
        )));
    }
    if area > MAX_SITE_AREA {
        return Err(ImpactError::invalid(format!(
            "site area {area} exceeds the {MAX_SITE_AREA} m² limit"
        )));
    }

    let mut plants = Vec::new();

    for &plant_type in planting_order(kind) {
        let Some(quantity) = quantity_for(kind, plant_type, area) else {
            continue;
        };
        let Some(plant) = available_plants.iter().find(|p| p.plant_type == plant_type) else {
            log::debug!("No {plant_type} available for {kind} plan, skipping");
            continue;
        };
        if quantity == 0 {
            continue;
        }
        plants.push(PlanEntry {
            plant: plant.clone(),
            quantity,
        });
    }

    Ok(PlantingPlan {
        plants,
        total_area: area,
    })
}
