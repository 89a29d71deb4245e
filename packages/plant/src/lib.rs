#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Native plant catalog.
//!
//! The catalog is embedded at compile time (see [`registry`]) and is
//! loaded once by each process. The helpers here select plants from an
//! already-loaded slice so callers can supply their own lists in tests.

pub mod registry;

use green_map_plant_models::{Plant, PlantType};
use green_map_site_models::SiteKind;

pub use registry::all_plants;

/// Ground sites at least this large (m²) get tree recommendations.
pub const LARGE_GROUND_SITE_AREA: f64 = 100.0;

/// Lighter, drought-tolerant species for green roofs.
const ROOFTOP_PLANT_IDS: &[&str] = &["marigold", "lemongrass", "bougainvillea"];

/// Trees recommended for large ground sites.
const GROUND_TREE_IDS: &[&str] = &["frangipani", "neem"];

/// Understory species recommended for every ground site.
const GROUND_PLANT_IDS: &[&str] = &["siam-tulip", "marigold", "lemongrass"];

/// Looks up a plant by id.
#[must_use]
pub fn find_plant<'a>(plants: &'a [Plant], id: &str) -> Option<&'a Plant> {
    plants.iter().find(|p| p.id == id)
}

/// Returns the plants of the given type, preserving order.
#[must_use]
pub fn plants_by_type(plants: &[Plant], plant_type: PlantType) -> Vec<&Plant> {
    plants.iter().filter(|p| p.plant_type == plant_type).collect()
}

/// Returns the recommended species for a site.
///
/// Ids missing from `plants` are skipped.
#[must_use]
pub fn recommended_plants(plants: &[Plant], area: f64, kind: SiteKind) -> Vec<Plant> {
    let ids: Vec<&str> = match kind {
        SiteKind::Rooftop => ROOFTOP_PLANT_IDS.to_vec(),
        SiteKind::Ground if area >= LARGE_GROUND_SITE_AREA => GROUND_TREE_IDS
            .iter()
            .chain(GROUND_PLANT_IDS)
            .copied()
            .collect(),
        SiteKind::Ground => GROUND_PLANT_IDS.to_vec(),
    };

    ids.into_iter()
        .filter_map(|id| {
            let plant = find_plant(plants, id);
            if plant.is_none() {
                log::debug!("Recommended plant '{id}' is not in the catalog");
            }
            plant.cloned()
        })
        .collect()
}
