//! HTTP routes and the middleware stack.
//!
//! Every response carries permissive CORS headers, and OPTIONS requests are
//! answered with 204 before routing. Request tracing is enabled via middleware
//! that generates a unique request ID for each incoming request.

pub mod chart_data;
pub mod health;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{
    CHART_DATA_PATH, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN, HEALTH_PATH,
};
use crate::middleware::{preflight_layer, request_id_layer};
use crate::state::AppState;

/// Creates the Axum router with all routes, CORS headers and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(CHART_DATA_PATH, get(chart_data::list))
        .route(HEALTH_PATH, get(health::health))
        .fallback(not_found)
        .with_state(state)
        // Pre-flight short circuit, inside the header layers so the 204 gets them too
        .layer(middleware::from_fn(preflight_layer))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
