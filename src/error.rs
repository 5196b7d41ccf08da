use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Db(#[from] DbError),
}

impl AppError {
    /// Plain-text body sent to the client. The underlying cause is only logged.
    fn public_message(&self) -> &'static str {
        match self {
            AppError::Db(DbError::Connection(_)) => "Database connection failed",
            AppError::Db(DbError::Query(_)) => "Failed to query data",
            AppError::Db(DbError::Decode(_)) => "Failed to read data",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}
