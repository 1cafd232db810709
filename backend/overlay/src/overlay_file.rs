//! The overlay file: goal list plus the encrypted location of the progress
//! bucket.
//!
//! ```json
//! {
//!   "goals": [{ "points": 100, "text": "Dye hair", "subtext": "blue" }],
//!   "encryptedBucketUrl": { "iv": "…", "data": "…" }
//! }
//! ```

use std::path::Path;
use std::time::SystemTime;

use goal_scroller::Catalog;
use serde::Deserialize;

use crate::crypto::EncryptedBlob;
use crate::errors::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFile {
    pub goals: Catalog,
    pub encrypted_bucket_url: EncryptedBlob,
}

impl OverlayFile {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::parse(&raw)
    }
}

/// Last modification time of the overlay file.
pub async fn modified(path: &Path) -> Result<SystemTime> {
    Ok(tokio::fs::metadata(path).await?.modified()?)
}
