#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planting plan allocation and environmental impact aggregation.
//!
//! [`plan::generate_plan`] turns a site area and kind into a deterministic
//! [`PlantingPlan`](green_map_impact_models::PlantingPlan);
//! [`metrics::compute_impact`] aggregates a plan into
//! [`ImpactMetrics`](green_map_impact_models::ImpactMetrics). Both are pure.

pub mod metrics;
pub mod plan;

pub use metrics::compute_impact;
pub use plan::generate_plan;

use thiserror::Error;

/// Errors that can occur while building or evaluating a planting plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImpactError {
    /// A numeric input was malformed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },
}

impl ImpactError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
