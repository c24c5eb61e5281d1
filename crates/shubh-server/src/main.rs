//! Chowgadhiya HTTP server.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 9090)
//! - `LATITUDE`, `LONGITUDE`: Observer location (default: 26.7880, 82.1986)
//! - `TIMEZONE`: IANA zone for "now" (default: system local)
//! - `DEBUG`: When set, log every evaluation step
//! - `RUST_LOG`: Log level when `DEBUG` is unset (default: info)

mod http;

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shubh_engine::{debug_log, Settings, ShubhEvaluator, SpaSunTimes};

use http::{create_router, AppState};

const DEFAULT_PORT: u16 = 9090;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let level = if settings.debug {
        Level::DEBUG
    } else {
        env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::INFO)
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!(
        latitude = settings.location.latitude,
        longitude = settings.location.longitude,
        timezone = ?settings.timezone,
        "Starting Chowgadhiya server"
    );

    let evaluator =
        ShubhEvaluator::new(settings.location, SpaSunTimes).with_log(debug_log(settings.debug));
    let app = create_router(AppState::new(evaluator, settings.timezone));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = match env::var("PORT") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT='{raw}': {e}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
