//! Long-running background tasks that feed the driver: the progress poll
//! and the overlay-file change check.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::driver::Update;
use crate::overlay_file::{self, OverlayFile};
use crate::source;

pub struct PollerState {
    pub client: Client,
    /// Decrypted bucket URL
    pub bucket_url: String,
    pub interval: Duration,
}

/// Poll the progress bucket forever, forwarding every result to the driver.
pub async fn run(state: Arc<PollerState>, updates: mpsc::Sender<Update>) {
    info!("Progress poller starting — every {:?}", state.interval);

    loop {
        let snapshot = source::poll(&state.client, &state.bucket_url).await;
        if updates.send(Update::Progress(snapshot)).await.is_err() {
            info!("Driver gone; progress poller stopping");
            return;
        }

        tokio::time::sleep(state.interval).await;
    }
}

/// Re-read the overlay file whenever its modification time changes and hand
/// the new goal list to the driver. Unreadable or invalid files are skipped.
pub async fn watch_overlay_file(path: PathBuf, interval: Duration, updates: mpsc::Sender<Update>) {
    let mut last_seen = overlay_file::modified(&path).await.ok();

    loop {
        tokio::time::sleep(interval).await;

        let modified = match overlay_file::modified(&path).await {
            Ok(modified) => modified,
            Err(e) => {
                warn!("Cannot stat overlay file {}: {e}", path.display());
                continue;
            }
        };
        if last_seen == Some(modified) {
            continue;
        }
        last_seen = Some(modified);

        match OverlayFile::load(&path).await {
            Ok(file) => {
                info!("Overlay file {} changed", path.display());
                if updates.send(Update::Catalog(file.goals)).await.is_err() {
                    info!("Driver gone; overlay file watcher stopping");
                    return;
                }
            }
            Err(e) => warn!("Ignoring invalid overlay file {}: {e}", path.display()),
        }
    }
}
