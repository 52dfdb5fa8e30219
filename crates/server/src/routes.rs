pub mod reviews;
pub mod services;

use axum::{routing::get, Json, Router};
use common::types::{Health, LIVENESS_BANNER};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Plain-text liveness banner.
#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service is up", body = String)))]
pub async fn root() -> &'static str {
    LIVENESS_BANNER
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: liveness, services, categories, reviews.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let service_routes = Router::new()
        .route("/services", get(services::list_services).post(services::create_service))
        .route("/services/featured", get(services::featured_services))
        .route(
            "/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route("/categories", get(services::list_categories));

    // `/reviews/:id` is a service id for GET and a review id for PUT/DELETE.
    let review_routes = Router::new()
        .route("/reviews", get(reviews::reviews_for_owner).post(reviews::create_review))
        .route(
            "/reviews/:id",
            get(reviews::reviews_for_service)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        );

    public
        .merge(service_routes)
        .merge(review_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
