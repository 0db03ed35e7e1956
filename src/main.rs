// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bintree_api::{app, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    config.stores().check_files();

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, tree_db = %config.tree_db.display(), "listening");

    axum::serve(listener, app(&config).into_make_service()).await?;
    Ok(())
}
