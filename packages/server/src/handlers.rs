//! HTTP handler functions for the green map API.

use std::fmt::Display;

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use green_map_ai::AiError;
use green_map_ai::detection;
use green_map_ai::proposal::{self, ProposalRequest};
use green_map_ai::recommendations::{self, RecommendationRequest};
use green_map_impact::{compute_impact, generate_plan};
use green_map_impact_models::PlantingPlan;
use green_map_plant::{plants_by_type, recommended_plants};
use green_map_server_models::{
    ApiDetectionRequest, ApiDetectionResponse, ApiError, ApiHealth, ApiPlanRequest,
    ApiPlanResponse, PlantQueryParams,
};

use crate::AppState;

fn bad_request(e: &impl Display) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
}

/// Answers malformed JSON bodies with an [`ApiError`].
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(&err);
    InternalError::from_response(err, response).into()
}

/// Answers malformed query strings with an [`ApiError`].
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(&err);
    InternalError::from_response(err, response).into()
}

/// Uses the server's configured location when a request leaves it blank.
fn default_location(location: &mut String, state: &AppState) {
    if location.trim().is_empty() {
        location.clone_from(&state.location);
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/plants`
///
/// Lists the plant catalog, optionally filtered by `?type=`.
pub async fn plants(
    state: web::Data<AppState>,
    params: web::Query<PlantQueryParams>,
) -> HttpResponse {
    match params.plant_type {
        Some(plant_type) => HttpResponse::Ok().json(plants_by_type(&state.plants, plant_type)),
        None => HttpResponse::Ok().json(&state.plants),
    }
}

/// `POST /api/ai-detection`
///
/// Finds candidate sites with the requested method. Generator failures
/// fall back to deterministic sites, so only invalid requests fail.
pub async fn ai_detection(
    state: web::Data<AppState>,
    body: web::Json<ApiDetectionRequest>,
) -> HttpResponse {
    let ApiDetectionRequest { method, request } = body.into_inner();

    match detection::detect(method, state.provider(), &request, &state.weights).await {
        Ok(sites) => HttpResponse::Ok().json(ApiDetectionResponse { sites }),
        Err(e) => {
            log::warn!("Rejected detection request: {e}");
            bad_request(&e)
        }
    }
}

/// `POST /api/plan`
///
/// Builds a planting plan from the species recommended for the site and
/// computes its impact.
pub async fn plan(state: web::Data<AppState>, body: web::Json<ApiPlanRequest>) -> HttpResponse {
    let ApiPlanRequest { area, site_type } = body.into_inner();

    let available = recommended_plants(&state.plants, area, site_type);
    let plan = match generate_plan(area, site_type, &available) {
        Ok(plan) => plan,
        Err(e) => return bad_request(&e),
    };

    match compute_impact(&plan) {
        Ok(impact) => HttpResponse::Ok().json(ApiPlanResponse { plan, impact }),
        Err(e) => bad_request(&e),
    }
}

/// `POST /api/impact`
///
/// Computes the impact of a caller-supplied planting plan.
pub async fn impact(body: web::Json<PlantingPlan>) -> HttpResponse {
    match compute_impact(&body) {
        Ok(impact) => HttpResponse::Ok().json(impact),
        Err(e) => bad_request(&e),
    }
}

/// `POST /api/recommendations`
///
/// Asks the generator for planting advice. There is no local substitute,
/// so generator failures answer `502`.
pub async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<RecommendationRequest>,
) -> HttpResponse {
    let mut request = body.into_inner();
    default_location(&mut request.location, &state);

    if let Err(e) = request.validate() {
        return bad_request(&e);
    }

    let Some(provider) = state.provider() else {
        return HttpResponse::BadGateway().json(ApiError::new(
            "Failed to generate recommendations: no AI provider configured",
        ));
    };

    match recommendations::generate_recommendations(provider, &request).await {
        Ok(recs) => HttpResponse::Ok().json(recs),
        Err(e @ AiError::InvalidInput { .. }) => bad_request(&e),
        Err(e) => {
            log::error!("Failed to generate recommendations: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to generate recommendations"))
        }
    }
}

/// `POST /api/proposal`
///
/// Drafts a community proposal, falling back to stock text if the generator
/// is unavailable.
pub async fn proposal(
    state: web::Data<AppState>,
    body: web::Json<ProposalRequest>,
) -> HttpResponse {
    let mut request = body.into_inner();
    default_location(&mut request.location, &state);

    match proposal::generate_proposal_or_fallback(state.provider(), &request).await {
        Ok(proposal) => HttpResponse::Ok().json(proposal),
        Err(e) => bad_request(&e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use green_map_ai::providers::{CompletionRequest, LlmProvider};
    use green_map_scoring::ScoringWeights;
    use serde_json::{Value, json};

    use super::*;
    use crate::configure;

    struct CannedProvider {
        reply: &'static str,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            Ok(self.reply.to_string())
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn state(provider: Option<Arc<dyn LlmProvider>>) -> web::Data<AppState> {
        web::Data::new(AppState {
            provider,
            plants: green_map_plant::all_plants(),
            weights: ScoringWeights::default(),
            location: "Chiang Mai, Thailand".to_string(),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(configure)).await
        };
    }

    fn ids(body: &Value) -> Vec<&str> {
        body["sites"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect()
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(state(None));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn lists_and_filters_plants() {
        let app = app!(state(None));

        let req = test::TestRequest::get().uri("/api/plants").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 6);

        let req = test::TestRequest::get()
            .uri("/api/plants?type=tree")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["frangipani", "neem"]);

        let req = test::TestRequest::get()
            .uri("/api/plants?type=cactus")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn heuristic_detection() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/ai-detection")
            .set_json(json!({
                "method": "smart_heuristics",
                "request": {"coordinates": [100.5018, 13.7563], "radius": 1000, "areaType": "urban"}
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), ["heuristics-2", "heuristics-1", "heuristics-3"]);
        assert!(body["sites"][0].get("features").is_none());
        assert_eq!(body["sites"][0]["siteType"], "parking_lot");
    }

    #[actix_web::test]
    async fn generator_detection_falls_back() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/ai-detection")
            .set_json(json!({
                "method": "openai_vision",
                "request": {"coordinates": [100.5018, 13.7563], "radius": 1000, "areaType": "mixed"}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(ids(&body), ["fallback-1", "fallback-2"]);
    }

    #[actix_web::test]
    async fn detection_rejects_bad_input() {
        let app = app!(state(None));

        let req = test::TestRequest::post()
            .uri("/api/ai-detection")
            .set_json(json!({
                "method": "smart_heuristics",
                "request": {"coordinates": [100.5, 13.75], "radius": 0, "areaType": "urban"}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("radius"));

        let req = test::TestRequest::post()
            .uri("/api/ai-detection")
            .set_json(json!({
                "method": "satellite",
                "request": {"coordinates": [100.5, 13.75], "radius": 500, "areaType": "urban"}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn plan_with_impact() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/plan")
            .set_json(json!({"area": 120, "siteType": "vacant_lot"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let entries: Vec<(&str, u64)> = body["plan"]["plants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| (e["plant"]["id"].as_str().unwrap(), e["quantity"].as_u64().unwrap()))
            .collect();
        assert_eq!(entries, [("frangipani", 2), ("siam-tulip", 6), ("marigold", 8)]);
        assert_eq!(body["impact"]["stormwaterReduction"]["litersPerYear"], 500);
        assert_eq!(body["impact"]["co2Sequestration"]["kgPerYear"], 70);
        assert_eq!(body["impact"]["biodiversitySupport"]["level"], "medium");
    }

    #[actix_web::test]
    async fn rooftop_plan() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/plan")
            .set_json(json!({"area": 65, "siteType": "rooftop"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = body["plan"]["plants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["plant"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["lemongrass", "marigold", "bougainvillea"]);
    }

    #[actix_web::test]
    async fn plan_rejects_non_positive_area() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/plan")
            .set_json(json!({"area": 0, "siteType": "ground"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn impact_of_posted_plan() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/plan")
            .set_json(json!({"area": 120, "siteType": "ground"}))
            .to_request();
        let planned: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/impact")
            .set_json(&planned["plan"])
            .to_request();
        let impact: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(impact, planned["impact"]);

        let mut zero = planned["plan"].clone();
        zero["plants"][0]["quantity"] = json!(0);
        let req = test::TestRequest::post()
            .uri("/api/impact")
            .set_json(&zero)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn recommendations_need_a_provider() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/recommendations")
            .set_json(json!({"siteDescription": "Lot", "area": 85, "siteType": "ground"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let req = test::TestRequest::post()
            .uri("/api/recommendations")
            .set_json(json!({"siteDescription": "", "area": 85, "siteType": "ground"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn recommendations_use_configured_location() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider: Arc<dyn LlmProvider> = Arc::new(CannedProvider {
            reply: "Plant neem.\n\nIt is native.",
            prompts: Arc::clone(&prompts),
        });
        let app = app!(state(Some(provider)));
        let req = test::TestRequest::post()
            .uri("/api/recommendations")
            .set_json(json!({"siteDescription": "Lot", "area": 85, "siteType": "ground"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["recommendations"], "Plant neem.");
        assert_eq!(body["rationale"], "It is native.");
        assert!(prompts.lock().unwrap()[0].contains("Location: Chiang Mai, Thailand"));
    }

    #[actix_web::test]
    async fn proposal_falls_back() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/proposal")
            .set_json(json!({
                "siteName": "Soi 38 Lot",
                "siteDescription": "Vacant lot",
                "plantPlan": "2 x Neem (Azadirachta indica)",
                "impactMetrics": {"stormwater": 400, "co2": 70, "biodiversity": "low"}
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Soi 38 Lot Community Greening Project");
        assert!(body["benefits"].as_str().unwrap().contains("400 liters"));
        assert!(body["generatedAt"].is_string());
    }

    #[actix_web::test]
    async fn proposal_rejects_missing_fields() {
        let app = app!(state(None));
        let req = test::TestRequest::post()
            .uri("/api/proposal")
            .set_json(json!({
                "siteName": "",
                "siteDescription": "Vacant lot",
                "plantPlan": "",
                "impactMetrics": {"stormwater": 0, "co2": 0, "biodiversity": "low"}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
