//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes());
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/converter/convert-file", post(api::convert_file))
        .route("/api/flashcards/generate-flashcards", post(api::generate_flashcards))
        .route("/api/infographic/generate-infographic", post(api::generate_infographic))
        .route("/api/payment/create-checkout", post(api::create_checkout))
        .route("/api/payment/customer-portal", post(api::customer_portal))
        .route("/api/payment/check-subscription", post(api::check_subscription))
        // Paths the web client calls without the /payment segment
        .route("/api/create-checkout", post(api::create_checkout))
        .route("/api/customer-portal", post(api::customer_portal))
        .route("/api/check-subscription", post(api::check_subscription))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

/// `*` allows any origin; anything else is pinned to that single origin.
fn cors_layer(origin: &str) -> CorsLayer {
    if origin.trim() == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            warn!("Invalid CORS_ORIGIN '{}', allowing any origin", origin);
            CorsLayer::permissive()
        }
    }
}
