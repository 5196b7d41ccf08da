//! Handler for the chart data endpoint.

use axum::{extract::State, Json};
use tracing::instrument;

use crate::error::AppError;
use crate::record::{Envelope, Record};
use crate::state::AppState;

/// Returns every record of `template_data`, ordered by id, in an "ok" envelope.
///
/// Any database failure becomes a plain-text 500 with no partial data.
#[instrument(name = "chart_data::list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Record>>>, AppError> {
    let records = state.records.fetch_records().await?;
    Ok(Json(Envelope::ok(records)))
}
