//! chart-data-server: a read-only JSON API over the `template_data` table.
//!
//! A single endpoint, `GET /api/chart-data`, returns every row ordered by id in
//! a `{"status":"ok","data":[...]}` envelope. All responses carry permissive
//! CORS headers.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod record;
pub mod routes;
pub mod state;

pub use error::AppError;
