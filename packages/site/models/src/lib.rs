#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Candidate greening site types.
//!
//! A [`CandidateSite`] is produced by a detection step (the local heuristics
//! or an external text generator), is immutable afterwards, and is consumed
//! by plan generation and the UI. Sites are never persisted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A `[longitude, latitude]` pair in WGS84 degrees.
///
/// Serialized as a two-element array to match the map frontend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns a copy shifted by the given number of degrees.
    #[must_use]
    pub fn offset(self, d_lng: f64, d_lat: f64) -> Self {
        Self::new(self.lng + d_lng, self.lat + d_lat)
    }

    /// Whether both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self::new(lng, lat)
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

/// Kind of urban space a candidate site occupies.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteType {
    /// Unbuilt lot between buildings.
    VacantLot,
    /// Flat roof of a building.
    Rooftop,
    /// Surface parking area.
    ParkingLot,
    /// Strip between traffic lanes.
    Median,
    /// Pedestrian walkway verge.
    Sidewalk,
}

impl SiteType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::VacantLot,
            Self::Rooftop,
            Self::ParkingLot,
            Self::Median,
            Self::Sidewalk,
        ]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VacantLot => "Vacant lot",
            Self::Rooftop => "Rooftop",
            Self::ParkingLot => "Parking lot",
            Self::Median => "Median",
            Self::Sidewalk => "Sidewalk",
        }
    }
}

/// Planting context a site offers.
///
/// Rooftops carry lighter plantings; every other site type is planted in
/// the ground. Deserialization also accepts any [`SiteType`] name.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteKind {
    /// Green roof planting.
    Rooftop,
    /// In-ground planting.
    #[serde(alias = "vacant_lot", alias = "parking_lot", alias = "median", alias = "sidewalk")]
    Ground,
}

impl From<SiteType> for SiteKind {
    fn from(value: SiteType) -> Self {
        match value {
            SiteType::Rooftop => Self::Rooftop,
            SiteType::VacantLot | SiteType::ParkingLot | SiteType::Median | SiteType::Sidewalk => {
                Self::Ground
            }
        }
    }
}

/// Urban density of the area being searched.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AreaType {
    /// Dense city core.
    Urban,
    /// Lower-density residential.
    Suburban,
    /// Mixed residential and commercial.
    Mixed,
}

/// How candidate sites are found.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DetectionMethod {
    /// Local deterministic heuristics and scoring.
    SmartHeuristics,
    /// The external text generator, validated, with a local fallback.
    OpenaiVision,
    /// Both of the above, merged by confidence.
    Hybrid,
}

/// Parameters for a site-detection request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRequest {
    /// Search centre.
    pub coordinates: LngLat,
    /// Search radius in meters.
    pub radius: f64,
    /// Urban density of the search area.
    pub area_type: AreaType,
}

/// Normalized scoring features for a site, each in `[0, 1]`.
///
/// Real accessibility, vegetation and green-proximity data is not available,
/// so sites that do not supply features get [`SiteFeatures::PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFeatures {
    /// Accessibility proxy. Higher is better.
    pub access: f64,
    /// Existing vegetation density. Lower is a better greening target.
    pub vegetation: f64,
    /// Proximity to existing green infrastructure. Closer is better.
    pub proximity_to_green: f64,
}

impl SiteFeatures {
    /// Fixed stand-in values used until real feature data is wired up.
    pub const PLACEHOLDER: Self = Self {
        access: 0.8,
        vegetation: 0.3,
        proximity_to_green: 0.6,
    };

    /// Whether every feature is a finite value in `[0, 1]`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        [self.access, self.vegetation, self.proximity_to_green]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

impl Default for SiteFeatures {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

/// A location proposed as a greening opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSite {
    /// Unique identifier.
    pub id: String,
    /// Site location.
    pub coordinates: LngLat,
    /// Area in square meters.
    pub area: f64,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
    /// Kind of space.
    pub site_type: SiteType,
    /// Free-text description.
    pub description: String,
    /// What the site is used for today.
    pub current_use: String,
    /// What the site could become.
    pub potential: String,
    /// Scoring inputs. Accepted on input, never emitted.
    #[serde(default, skip_serializing)]
    pub features: SiteFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_type_wire_names() {
        for site_type in SiteType::all() {
            let json = serde_json::to_string(site_type).unwrap();
            assert_eq!(json, format!("\"{site_type}\""));
            let parsed: SiteType = site_type.as_ref().parse().unwrap();
            assert_eq!(parsed, *site_type);
        }
        assert_eq!(SiteType::VacantLot.to_string(), "vacant_lot");
        assert_eq!(SiteType::ParkingLot.to_string(), "parking_lot");
    }

    #[test]
    fn site_kind_accepts_site_type_names() {
        for site_type in SiteType::all() {
            let kind: SiteKind = serde_json::from_str(&format!("\"{site_type}\"")).unwrap();
            assert_eq!(kind, SiteKind::from(*site_type));
        }
        let ground: SiteKind = serde_json::from_str("\"ground\"").unwrap();
        assert_eq!(ground, SiteKind::Ground);
        assert_eq!(serde_json::to_string(&SiteKind::Ground).unwrap(), "\"ground\"");
    }

    #[test]
    fn detection_method_wire_names() {
        let method: DetectionMethod = serde_json::from_str("\"smart_heuristics\"").unwrap();
        assert_eq!(method, DetectionMethod::SmartHeuristics);
        assert_eq!(DetectionMethod::OpenaiVision.to_string(), "openai_vision");
        assert_eq!("hybrid".parse::<DetectionMethod>().unwrap(), DetectionMethod::Hybrid);
        assert!(serde_json::from_str::<DetectionMethod>("\"satellite\"").is_err());
    }

    #[test]
    fn coordinates_serialize_as_pair() {
        let json = serde_json::to_string(&LngLat::new(100.5, 13.75)).unwrap();
        assert_eq!(json, "[100.5,13.75]");
        let parsed: LngLat = serde_json::from_str("[-73.9,40.7]").unwrap();
        assert_eq!(parsed, LngLat::new(-73.9, 40.7));
    }

    #[test]
    fn coordinate_range_check() {
        assert!(LngLat::new(100.5, 13.75).is_valid());
        assert!(!LngLat::new(181.0, 0.0).is_valid());
        assert!(!LngLat::new(0.0, -91.0).is_valid());
        assert!(!LngLat::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn features_default_on_input_and_skip_on_output() {
        let json = r#"{
            "id": "a",
            "coordinates": [100.5, 13.75],
            "area": 120.0,
            "confidence": 0.9,
            "siteType": "parking_lot",
            "description": "d",
            "currentUse": "c",
            "potential": "p"
        }"#;
        let site: CandidateSite = serde_json::from_str(json).unwrap();
        assert_eq!(site.features, SiteFeatures::PLACEHOLDER);
        assert_eq!(site.site_type, SiteType::ParkingLot);

        let value = serde_json::to_value(&site).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert!(!keys.contains(&"features"));
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn placeholder_features_are_normalized() {
        assert!(SiteFeatures::PLACEHOLDER.is_normalized());
        let bad = SiteFeatures {
            access: 1.2,
            ..SiteFeatures::PLACEHOLDER
        };
        assert!(!bad.is_normalized());
        let nan = SiteFeatures {
            vegetation: f64::NAN,
            ..SiteFeatures::PLACEHOLDER
        };
        assert!(!nan.is_normalized());
    }
}
