#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI for the green map toolchain.
//!
//! Lets users find candidate greening sites around a point, build a
//! planting plan with its environmental impact, draft a community proposal,
//! or start the API server, all from one prompt-driven entry point.

use dialoguer::{Confirm, Input, Select};
use green_map_ai::detection;
use green_map_ai::proposal::{self, DEFAULT_LOCATION, ProposalRequest};
use green_map_ai::providers::{LlmProvider, create_provider_from_env};
use green_map_impact::{compute_impact, generate_plan};
use green_map_plant::recommended_plants;
use green_map_scoring::ScoringWeights;
use green_map_site_models::{AreaType, DetectionMethod, DetectionRequest, LngLat, SiteKind};

/// Top-level tool selection for the green map toolchain.
enum Tool {
    DetectSites,
    PlanSite,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::DetectSites, Self::PlanSite, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::DetectSites => "Detect candidate sites",
            Self::PlanSite => "Plan a site",
            Self::Server => "Start server",
        }
    }
}

const AREA_TYPES: &[AreaType] = &[AreaType::Urban, AreaType::Suburban, AreaType::Mixed];

const METHODS: &[(DetectionMethod, &str)] = &[
    (DetectionMethod::SmartHeuristics, "Smart heuristics"),
    (DetectionMethod::OpenaiVision, "Text generator"),
    (DetectionMethod::Hybrid, "Hybrid"),
];

const SITE_KINDS: &[(SiteKind, &str)] = &[
    (SiteKind::Ground, "Ground (vacant lot, parking lot, median, sidewalk)"),
    (SiteKind::Rooftop, "Rooftop"),
];

fn provider_from_env() -> Option<Box<dyn LlmProvider>> {
    match create_provider_from_env() {
        Ok(provider) => Some(provider),
        Err(e) => {
            log::info!("No text generator available: {e}");
            None
        }
    }
}

async fn detect_sites() -> Result<(), Box<dyn std::error::Error>> {
    let lat: f64 = Input::new()
        .with_prompt("Latitude")
        .default(13.7563)
        .interact_text()?;
    let lng: f64 = Input::new()
        .with_prompt("Longitude")
        .default(100.5018)
        .interact_text()?;
    let radius: f64 = Input::new()
        .with_prompt("Search radius (m)")
        .default(1000.0)
        .interact_text()?;

    let area_labels: Vec<String> = AREA_TYPES.iter().map(ToString::to_string).collect();
    let area_type = AREA_TYPES[Select::new()
        .with_prompt("Area type")
        .items(&area_labels)
        .default(0)
        .interact()?];

    let method_labels: Vec<&str> = METHODS.iter().map(|(_, label)| *label).collect();
    let method = METHODS[Select::new()
        .with_prompt("Detection method")
        .items(&method_labels)
        .default(0)
        .interact()?]
    .0;

    let request = DetectionRequest {
        coordinates: LngLat::new(lng, lat),
        radius,
        area_type,
    };

    let provider = match method {
        DetectionMethod::SmartHeuristics => None,
        DetectionMethod::OpenaiVision | DetectionMethod::Hybrid => provider_from_env(),
    };

    let sites = detection::detect(
        method,
        provider.as_deref(),
        &request,
        &ScoringWeights::default(),
    )
    .await?;

    println!();
    for site in &sites {
        println!(
            "{} {} ({:.0} m², confidence {:.2}) at [{:.5}, {:.5}]",
            site.id,
            site.site_type.label(),
            site.area,
            site.confidence,
            site.coordinates.lng,
            site.coordinates.lat
        );
        println!("    {}", site.description);
        println!("    Potential: {}", site.potential);
    }

    Ok(())
}

async fn plan_site() -> Result<(), Box<dyn std::error::Error>> {
    let area: f64 = Input::new()
        .with_prompt("Site area (m²)")
        .default(100.0)
        .interact_text()?;

    let kind_labels: Vec<&str> = SITE_KINDS.iter().map(|(_, label)| *label).collect();
    let kind = SITE_KINDS[Select::new()
        .with_prompt("Site kind")
        .items(&kind_labels)
        .default(0)
        .interact()?]
    .0;

    let catalog = green_map_plant::all_plants();
    let available = recommended_plants(&catalog, area, kind);
    let plan = generate_plan(area, kind, &available)?;
    let impact = compute_impact(&plan)?;

    println!();
    println!("Planting plan for {area} m² ({kind}):");
    for entry in &plan.plants {
        println!(
            "  {:>3} x {} ({})",
            entry.quantity, entry.plant.name, entry.plant.scientific_name
        );
    }
    println!();
    println!("Impact:");
    println!(
        "  Stormwater: {} L/year",
        impact.stormwater_reduction.liters_per_year
    );
    println!(
        "  CO₂:        {} kg/year ({})",
        impact.co2_sequestration.kg_per_year, impact.co2_sequestration.equivalent
    );
    println!(
        "  Biodiversity: {} ({} pollinator species)",
        impact.biodiversity_support.level, impact.biodiversity_support.pollinator_species
    );
    println!("  {}", impact.air_quality_improvement.description);
    println!();

    if !Confirm::new()
        .with_prompt("Draft a community proposal?")
        .default(false)
        .interact()?
    {
        return Ok(());
    }

    let site_name: String = Input::new().with_prompt("Site name").interact_text()?;
    let site_description: String = Input::new()
        .with_prompt("Site description")
        .interact_text()?;
    let location: String = Input::new()
        .with_prompt("Location")
        .default(
            std::env::var("GREEN_MAP_LOCATION").unwrap_or_else(|_| DEFAULT_LOCATION.to_string()),
        )
        .interact_text()?;

    let request =
        ProposalRequest::from_plan(site_name, site_description, &plan, &impact, location);
    let provider = provider_from_env();
    let proposal =
        proposal::generate_proposal_or_fallback(provider.as_deref(), &request).await?;

    println!();
    println!("# {}", proposal.title);
    for section in [
        &proposal.introduction,
        &proposal.benefits,
        &proposal.implementation,
        &proposal.next_steps,
        &proposal.conclusion,
    ] {
        println!();
        println!("{section}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    println!("Green Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::DetectSites => detect_sites().await?,
        Tool::PlanSite => plan_site().await?,
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(green_map_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
