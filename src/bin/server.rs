//! Plek HTTP server binary.
//!
//! Initializes the repository, builds the router, and serves requests.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (overrides `server.host`, default: 0.0.0.0)
//! - `PORT`: Server port (overrides `server.port`, default: 8080)
//! - `PLEK_CONFIG`: Path to the TOML config file (default: search for `plek.toml`)
//! - `REVENUECAT_API_KEY`: Billing API key when `billing.provider = "revenuecat"`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use plek_backend::config::AppConfig;
use plek_backend::db::{self, SessionRepository};
use plek_backend::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Plek HTTP Server");

    let config = match env::var("PLEK_CONFIG") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::from_default_location().unwrap_or_else(|e| {
            warn!(error = %e, "no config file found; using defaults");
            AppConfig::default()
        }),
    };

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Seed local sessions from config so a fresh server is usable without
    // an external login flow.
    for (token, customer_id) in &config.auth.sessions {
        repository.insert_session(token, customer_id).await?;
    }

    let billing = config.build_verifier()?;
    let state = AppState::new(repository, billing);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
