#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the green map application.
//!
//! Serves the REST API used by the map frontend: the plant catalog, site
//! detection, planting plans with their impact, and generator-backed plant
//! recommendations and community proposals. All state is loaded once at
//! startup and is read-only afterwards.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use green_map_ai::providers::{LlmProvider, create_provider_from_env};
use green_map_ai::proposal::DEFAULT_LOCATION;
use green_map_plant_models::Plant;
use green_map_scoring::ScoringWeights;

/// Shared application state.
pub struct AppState {
    /// Text generator, if credentials are configured.
    pub provider: Option<Arc<dyn LlmProvider>>,
    /// The plant catalog.
    pub plants: Vec<Plant>,
    /// Weights for site scoring.
    pub weights: ScoringWeights,
    /// Location quoted in generated text when a request does not name one.
    pub location: String,
}

impl AppState {
    /// Builds state from the embedded catalog and environment variables.
    ///
    /// A missing or misconfigured AI provider is not fatal: generator-backed
    /// endpoints fall back or report the generator as unavailable.
    #[must_use]
    pub fn from_env() -> Self {
        let provider = match create_provider_from_env() {
            Ok(provider) => {
                log::info!("Using AI provider {}", provider.name());
                Some(Arc::from(provider))
            }
            Err(e) => {
                log::warn!("AI provider unavailable, generator features will fall back: {e}");
                None
            }
        };

        let location =
            std::env::var("GREEN_MAP_LOCATION").unwrap_or_else(|_| DEFAULT_LOCATION.to_string());

        Self {
            provider,
            plants: green_map_plant::all_plants(),
            weights: ScoringWeights::default(),
            location,
        }
    }

    fn provider(&self) -> Option<&dyn LlmProvider> {
        self.provider.as_deref()
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(handlers::json_error))
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error))
            .route("/health", web::get().to(handlers::health))
            .route("/plants", web::get().to(handlers::plants))
            .route("/ai-detection", web::post().to(handlers::ai_detection))
            .route("/plan", web::post().to(handlers::plan))
            .route("/impact", web::post().to(handlers::impact))
            .route("/recommendations", web::post().to(handlers::recommendations))
            .route("/proposal", web::post().to(handlers::proposal)),
    );
}

/// Starts the green map API server.
///
/// Loads the plant catalog, sets up the AI provider from the environment,
/// and starts the Actix-Web HTTP server on `BIND_ADDR:PORT`. This is a
/// regular async function; the caller is responsible for providing the
/// async runtime (e.g. via `#[actix_web::main]`) and for initialising
/// logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    log::info!("Loading plant catalog and AI provider...");
    let state = web::Data::new(AppState::from_env());
    log::info!("Loaded {} plants", state.plants.len());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
