//! Health check endpoint for container orchestration.
//!
//! A liveness probe only: it answers without touching the database.

/// Health check handler.
pub async fn health() -> &'static str {
    "ok"
}
