//! Charity stream goal overlay — entry point.
//!
//! Unlocks the progress bucket with the key from the overlay URL, then runs
//! three background tasks: the progress poller, the overlay-file watcher and
//! the driver that owns the goal scroller. The rendered overlay and the
//! supporter dashboard are served by a small Axum API.

mod api;
mod config;
mod crypto;
mod dashboard;
mod driver;
mod errors;
mod overlay_file;
mod poller;
mod render;
mod source;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use reqwest::Client;
use tokio::sync::{mpsc, watch};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use crypto::AccessKey;
use driver::{OverlayModel, Published};
use errors::{OverlayError, Result};
use overlay_file::OverlayFile;
use poller::PollerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let overlay = OverlayFile::load(&config.overlay_file).await?;
    info!(
        "Loaded {} goals from {}",
        overlay.goals.len(),
        config.overlay_file.display()
    );

    let (published_tx, published_rx) = watch::channel(Published::invalid_key());

    match unlock(&config, &overlay) {
        Ok((key, bucket_url)) => {
            let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
            let (updates_tx, updates_rx) = mpsc::channel(16);

            // ─── Driver ───────────────────────────────────────────
            let model = OverlayModel::new(
                overlay.goals,
                key,
                config.timing(),
                config.leaderboard_size,
            );
            tokio::spawn(driver::run(model, updates_rx, published_tx));

            // ─── Background pollers ───────────────────────────────
            let poller_state = Arc::new(PollerState {
                client,
                bucket_url,
                interval: config.poll_interval(),
            });
            tokio::spawn(poller::run(poller_state, updates_tx.clone()));
            tokio::spawn(poller::watch_overlay_file(
                config.overlay_file.clone(),
                config.config_poll_interval(),
                updates_tx,
            ));
        }
        Err(OverlayError::InvalidKey | OverlayError::Decrypt(_)) => {
            error!("Invalid key; serving the error view only");
        }
        Err(e) => return Err(e.into()),
    }

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        published: published_rx,
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/overlay", get(api::overlay_html))
        .route("/overlay/state", get(api::overlay_state))
        .route("/dashboard", get(api::dashboard))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!(
        "API listening on http://{addr} ({} mode)",
        if config.dev_mode { "development" } else { "production" }
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Import the key from the overlay URL and decrypt the bucket location.
fn unlock(config: &Config, overlay: &OverlayFile) -> Result<(AccessKey, String)> {
    let key = AccessKey::from_overlay_url(&config.overlay_url)?;
    let bucket_url = key.decrypt(&overlay.encrypted_bucket_url)?;
    Ok((key, bucket_url))
}
