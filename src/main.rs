//! chart-data-server: a read-only JSON API over `template_data`.
//!
//! This is the application entry point. It loads configuration from an optional
//! TOML file and the environment, initializes tracing, builds the lazily
//! connected PostgreSQL pool, sets up the Axum router and serves until the
//! process is killed.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chart_data_server::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use chart_data_server::db::PgRecordSource;
use chart_data_server::routes::create_router;
use chart_data_server::state::AppState;

/// Serves the template_data table as JSON
#[derive(Parser, Debug)]
#[command(name = "chart-data-server", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "chart_data_server=debug,sqlx=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            // The configured log format is unknown here, so log as text
            init_tracing(&log_filter, LogFormat::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    init_tracing(&log_filter, config.logging.format);

    tracing::info!(
        database = %config.database.target(),
        max_connections = config.database.max_connections,
        acquire_timeout_seconds = config.database.acquire_timeout_seconds,
        "Database pool configured"
    );
    let records = PgRecordSource::connect_lazy(&config.database);

    let app = create_router(AppState::new(records));

    let addr = config.http.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!(%addr, error = %e, "Failed to bind listener"))?;
    tracing::info!("Server is running at http://{}", addr);

    axum::serve(listener, app)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Server failed"))?;

    Ok(())
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}
