//! Recipebox HTTP server
//!
//! Serves the recipe JSON API and public recipe pages.
//!
//! # Configuration
//!
//! Environment variables:
//! - `RECIPEBOX_LISTEN_ADDR`: Address to listen on (default: 0.0.0.0:8080)
//! - `RECIPEBOX_DATABASE_PATH`: SQLite database file
//! - `RECIPEBOX_CONFIG`: Path to config file (default: ~/.config/recipebox/config.yaml)

use recipebox::config::Config;
use recipebox::db::init_db;
use recipebox::server::{router, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox=info,recipebox_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("RECIPEBOX_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path)?;

    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }
    tracing::info!("Database: {}", config.database_path.value.display());

    let pool = init_db(&config.database_path.value).await?;
    let app = router(AppState::new(pool));

    let addr = config.listen_addr.value;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
