//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{HTTP_CONCURRENCY_LIMIT, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use filedrop_core::policy::MAX_SIZE_BYTES;
use filedrop_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let cors = setup_cors(config);

    // Bodies above the policy limit plus multipart framing are cut off at the
    // transport; anything between the policy limit and this cap still gets a
    // clean 400 from validation.
    let body_limit = (MAX_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES) as usize;

    Router::new()
        .route("/api/v0/uploads", post(handlers::upload::upload_file))
        .route(
            "/api/v0/uploads/presigned",
            post(handlers::presigned::create_presigned_url),
        )
        .route("/api/v0/contact", post(handlers::contact::submit_inquiry))
        .route("/health", get(handlers::health::health))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .with_state(state)
}

/// CORS for the browser-side upload client: POST plus the OPTIONS preflight.
fn setup_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
