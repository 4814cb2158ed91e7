use crate::core::normalize_pet;
use crate::models::{
    ErrorResponse, HealthResponse, InvalidateResponse, SubmitQuestionnaireRequest,
    UpsertListingsRequest, UpsertListingsResponse,
};
use crate::services::{EngineError, MatchingEngine};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchingEngine,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(submit_questionnaire))
        .route("/recommendations/{adopter_id}", web::get().to(get_recommendations))
        .route("/recommendations/{adopter_id}", web::delete().to(invalidate_recommendations))
        .route(
            "/recommendations/{adopter_id}/pets/{pet_id}",
            web::get().to(get_pet_score),
        )
        .route("/listings", web::put().to(upsert_listings));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_adopters: state.engine.cache_stats().entries,
    })
}

/// Submit (or retake) the questionnaire and rank the supplied pets
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "answers": { "adopterId": "string", "livingSpace": "apartment", ... },
///   "pets": [{ "petId": "string", "energyLevel": "low", ... }]
/// }
/// ```
async fn submit_questionnaire(
    state: web::Data<AppState>,
    req: web::Json<SubmitQuestionnaireRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for questionnaire request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_error",
            errors.to_string(),
            400,
        ));
    }

    let req = req.into_inner();
    tracing::info!(
        "Questionnaire submitted for {:?} with {} listings",
        req.answers.adopter_id,
        req.pets.len()
    );

    match state.engine.submit_answers(&req.answers, &req.pets).await {
        Ok(set) => HttpResponse::Ok().json(set.as_ref()),
        Err(EngineError::InvalidAnswers(e)) => {
            tracing::info!("Rejected questionnaire: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                field: Some(e.field().to_string()),
                ..ErrorResponse::new("validation_error", e.to_string(), 400)
            })
        }
        Err(e) => {
            tracing::error!("Failed to rank recommendations: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "ranking_failed",
                e.to_string(),
                500,
            ))
        }
    }
}

/// GET /api/v1/recommendations/{adopter_id}
async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let adopter_id = path.into_inner();

    match state.engine.recommendations(&adopter_id).await {
        Some(set) => HttpResponse::Ok().json(set.as_ref()),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("No recommendations for adopter {}", adopter_id),
            404,
        )),
    }
}

/// GET /api/v1/recommendations/{adopter_id}/pets/{pet_id}
async fn get_pet_score(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (adopter_id, pet_id) = path.into_inner();

    match state.engine.get_score(&adopter_id, &pet_id).await {
        Some(score) => HttpResponse::Ok().json(score),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("No score for pet {} and adopter {}", pet_id, adopter_id),
            404,
        )),
    }
}

/// DELETE /api/v1/recommendations/{adopter_id}
async fn invalidate_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let adopter_id = path.into_inner();
    let version = state.engine.invalidate(&adopter_id).await;

    tracing::info!("Invalidated recommendations for {} (v{})", adopter_id, version);

    HttpResponse::Ok().json(InvalidateResponse {
        adopter_id,
        version,
    })
}

/// Record listing snapshots for later on-demand scoring
///
/// PUT /api/v1/listings
async fn upsert_listings(
    state: web::Data<AppState>,
    req: web::Json<UpsertListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_error",
            errors.to_string(),
            400,
        ));
    }

    let mut pets = Vec::with_capacity(req.pets.len());
    let mut rejected = 0;
    for raw in &req.pets {
        match normalize_pet(raw) {
            Ok(pet) => pets.push(pet),
            Err(e) => {
                tracing::warn!("Rejected listing: {}", e);
                rejected += 1;
            }
        }
    }

    state.engine.record_listings(&pets).await;
    tracing::info!("Recorded {} listings ({} rejected)", pets.len(), rejected);

    HttpResponse::Ok().json(UpsertListingsResponse {
        accepted: pets.len(),
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ranker;
    use crate::services::{ListingRegistry, RecommendationCache};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn create_state() -> AppState {
        AppState {
            engine: MatchingEngine::new(
                Ranker::with_default_policy(),
                Arc::new(RecommendationCache::new(100, 300)),
                Arc::new(ListingRegistry::new()),
            ),
        }
    }

    fn answers() -> Value {
        json!({
            "adopterId": "adopter-1",
            "livingSpace": "house-with-yard",
            "energyTolerance": "high",
            "experienceLevel": "experienced",
            "kidsAtHome": "none",
            "specialCareCapacity": "full"
        })
    }

    fn listing(id: &str, energy: &str) -> Value {
        json!({
            "petId": id,
            "idealLivingSpace": "apartment",
            "energyLevel": energy,
            "experienceNeeded": "none",
            "kidsCompatibility": "all-ages",
            "specialCareNeeds": "none",
            "adoptionStatus": "available"
        })
    }

    #[actix_web::test]
    async fn test_submit_then_lookup() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "answers": answers(), "pets": [listing("rex", "high"), listing("tom", "low")] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["adopterId"], "adopter-1");
        assert_eq!(body["matching"][0]["petId"], "rex");
        assert_eq!(body["matching"][0]["overallScore"], 100);
        assert_eq!(body["matching"][0]["label"], "SUITABLE");
        assert_eq!(body["profile"]["version"], 1);

        let req = test::TestRequest::get()
            .uri("/recommendations/adopter-1/pets/tom")
            .to_request();
        let score: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(score["petId"], "tom");
        assert!(score["reasons"].as_array().is_some_and(|r| !r.is_empty()));

        let req = test::TestRequest::get()
            .uri("/recommendations/adopter-1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_validation_error_names_field() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let mut bad = answers();
        bad["energyTolerance"] = json!("frantic");
        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "answers": bad, "pets": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["field"], "energyTolerance");
        assert!(body["message"].as_str().unwrap().contains("frantic"));
    }

    #[actix_web::test]
    async fn test_invalidate_then_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "answers": answers(), "pets": [listing("rex", "high")] }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::delete()
            .uri("/recommendations/adopter-1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "adopterId": "adopter-1", "version": 2 }));

        for uri in ["/recommendations/adopter-1", "/recommendations/adopter-1/pets/rex"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn test_upsert_listings_feeds_on_demand_scoring() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "answers": answers(), "pets": [] }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::put()
            .uri("/listings")
            .set_json(json!({
                "pets": [listing("newcomer", "medium"), { "petId": "  " }, { "energyLevel": "low" }]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "accepted": 1, "rejected": 2 }));

        let req = test::TestRequest::get()
            .uri("/recommendations/adopter-1/pets/newcomer")
            .to_request();
        let score: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(score["petId"], "newcomer");
        assert_eq!(score["profileVersion"], 1);
    }

    #[actix_web::test]
    async fn test_submit_scores_wrongly_typed_listing_as_unreadable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let mut typed = listing("flagged", "high");
        typed["kidsCompatibility"] = json!(true);
        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({
                "answers": answers(),
                "pets": [listing("rex", "high"), typed, { "energyLevel": "high", "adoptionStatus": "available" }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let matching = body["matching"].as_array().unwrap();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching[0]["petId"], "rex");
        assert_eq!(matching[1]["petId"], "flagged");
        assert_eq!(matching[1]["overallScore"], 60);
        assert_eq!(
            matching[1]["reasons"].as_array().and_then(|r| r.last()),
            Some(&json!("Some shelter details for this pet could not be read"))
        );
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }
}
