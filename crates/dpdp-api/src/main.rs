//! # dpdp-api — Binary Entry Point
//!
//! Loads the catalog and starts the Axum HTTP server.
//! Binds to the port in `PORT` (default 8080); `DPDP_CATALOG` names an
//! alternative catalog file. Idle sessions are swept in the background
//! per `DPDP_SESSION_TTL_SECS`.

use dpdp_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let catalog = config.load_catalog().map_err(|e| {
        tracing::error!("Catalog load failed: {e}");
        e
    })?;
    tracing::info!(
        name = %catalog.metadata().name,
        chapters = catalog.chapter_count(),
        sections = catalog.section_count(),
        "catalog ready"
    );

    let port = config.port;
    let sweep = config.sweep_interval();
    let state = AppState::with_config(catalog, config);
    if let Some(period) = sweep {
        let state = state.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let expired = state.expire_idle_sessions(chrono::Utc::now());
                if expired > 0 {
                    tracing::info!(expired, remaining = state.sessions.len(), "idle sessions swept");
                }
            }
        });
    }
    let app = dpdp_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("DPDP audit API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
