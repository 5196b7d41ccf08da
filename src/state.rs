//! Shared application state for request handlers.

use std::sync::Arc;

use crate::db::RecordSource;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the record source that backs the chart data endpoint. Nothing in it
/// is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordSource>,
}

impl AppState {
    /// Creates a new application state around the given record source.
    pub fn new<S: RecordSource + 'static>(records: S) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}
