//! lens-relay: image analysis relay in front of the Gemini generateContent API
//!
//! One POST endpoint takes an image plus tone, optional question and
//! language, renders a prompt from the per-language template set, forwards
//! both to the inference API and returns its JSON response unchanged.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request},
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::Config;
use crate::services::{AnalyzeService, GeminiClient, InferenceClient};

pub const ANALYZE_PATH: &str = "/api/analyze";
/// Same handler, mounted where existing serverless-function clients post to
pub const LEGACY_ANALYZE_PATH: &str = "/.netlify/functions/analyze";

pub struct AppState {
    pub config: Config,
    pub analyze_service: AnalyzeService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = GeminiClient::new(&config.upstream);
        tracing::info!("Inference endpoint: {}", client.endpoint());
        Self::with_client(config, Arc::new(client))
    }

    pub fn with_client(config: Config, client: Arc<dyn InferenceClient>) -> Self {
        Self { config, analyze_service: AnalyzeService::new(client) }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::analyze::analyze_image, handlers::health::health),
    components(schemas(models::AnalyzeImageRequest, handlers::health::HealthResponse)),
    tags(
        (name = "Analyze", description = "Image analysis relay"),
        (name = "System", description = "Service status")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// CORS for the configured browser origins only. Without origins there is no
/// CORS layer and OPTIONS falls through to the 405 handler like any other
/// non-POST method.
fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origins = config.server.allowed_origins();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]),
    )
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let analyze = post(handlers::analyze::analyze_image)
        .fallback(handlers::analyze::method_not_allowed);
    let body_limit = state.config.server.max_body_bytes;
    let cors = cors_layer(&state.config);

    let mut router = Router::new()
        .route(ANALYZE_PATH, analyze.clone())
        .route(LEGACY_ANALYZE_PATH, analyze)
        .route("/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::locale_middleware));

    if let Some(cors) = cors {
        tracing::info!("CORS enabled for {:?}", state.config.server.cors_origins);
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %uuid::Uuid::new_v4(),
            )
        }))
        .with_state(state)
}
