//! Request middleware: request-id tracing span and CORS pre-flight handling.
//!
//! The CORS response headers themselves are set by `SetResponseHeaderLayer`s in
//! the router so they land on every response, including the pre-flight 204
//! produced here.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

/// Wraps the request in a span carrying a fresh request ID and logs completion.
///
/// Must be the outermost layer so the span covers the other middleware.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Answers CORS pre-flight requests with 204 and an empty body.
///
/// OPTIONS requests never reach routing, so this holds for unknown paths too.
pub async fn preflight_layer(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .layer(middleware::from_fn(preflight_layer))
            .layer(middleware::from_fn(request_id_layer))
    }

    async fn send(method: Method) -> (StatusCode, String) {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri("/teapot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_request_id_layer_passes_response_through() {
        let (status, body) = send(Method::GET).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(body, "short and stout");
    }

    #[tokio::test]
    async fn test_preflight_layer_short_circuits_options() {
        let (status, body) = send(Method::OPTIONS).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }
}
