//! Nurse Scheduling - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:7860/health

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nurse_scheduling::api::{self, AppState};
use nurse_scheduling::config::Config;
use nurse_scheduling::demo_data;
use nurse_scheduling::store::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .init();

    let catalog = config.requirement_catalog()?;
    let nurses = config.demo_data.map(demo_data::generate).unwrap_or_default();
    info!(
        nurses = nurses.len(),
        requirements = catalog.requirements().len(),
        demo_data = config.demo_data.map(|d| d.as_str()),
        "Seeded store"
    );

    let store = Arc::new(InMemoryStore::with_nurses(nurses));
    let state = Arc::new(AppState::new(store, catalog));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
