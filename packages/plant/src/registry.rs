//! Compile-time registry of the native plant catalog.
//!
//! Each entry is a `(id, toml_content)` pair embedded via `include_str!`.
//! Adding a species requires creating a TOML file in `catalog/` and adding
//! a corresponding entry here.

use green_map_plant_models::Plant;

/// Number of registered plants. Enforced by a test.
#[cfg(test)]
const EXPECTED_PLANT_COUNT: usize = 6;

/// Embedded TOML plant definitions, in catalog order.
const PLANT_TOMLS: &[(&str, &str)] = &[
    ("frangipani", include_str!("../catalog/frangipani.toml")),
    ("siam-tulip", include_str!("../catalog/siam_tulip.toml")),
    ("neem", include_str!("../catalog/neem.toml")),
    ("marigold", include_str!("../catalog/marigold.toml")),
    ("lemongrass", include_str!("../catalog/lemongrass.toml")),
    ("bougainvillea", include_str!("../catalog/bougainvillea.toml")),
];

/// Returns every plant in the catalog, in catalog order.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_plants() -> Vec<Plant> {
    PLANT_TOMLS
        .iter()
        .map(|(id, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse plant '{id}': {e}"))
        })
        .collect()
}
