//! Progress bucket client — fetches and validates the JSON snapshot.
//!
//! The bucket is a plain JSON document:
//!
//! ```json
//! {
//!   "total": 1234.5,
//!   "supporters": [{ "name": { "iv": "…", "data": "…" }, "points": 300 }],
//!   "events":     [{ "name": { "iv": "…", "data": "…" }, "points": 25, "at": "2024-03-01T18:00:00Z" }]
//! }
//! ```
//!
//! Only `total` is required. Every failure (network, non-2xx status, body
//! that is not JSON, missing or non-numeric `total`) is reported the same way
//! to the overlay: no data for this poll.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::crypto::EncryptedBlob;
use crate::errors::{OverlayError, Result};

// ─────────────────────────────────────────────────────────
// Payload shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSupporter {
    pub name: EncryptedBlob,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEvent {
    pub name: EncryptedBlob,
    pub points: f64,
    /// RFC 3339 timestamp
    pub at: Option<String>,
}

/// One validated poll result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub total: f64,
    pub supporters: Vec<RawSupporter>,
    pub events: Vec<RawEvent>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch and validate one snapshot from the bucket.
pub async fn fetch_snapshot(client: &Client, bucket_url: &str) -> Result<Snapshot> {
    let response = client.get(bucket_url).send().await?.error_for_status()?;
    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body)?;
    let snapshot = decode_snapshot(&value)?;

    debug!(
        total = snapshot.total,
        supporters = snapshot.supporters.len(),
        events = snapshot.events.len(),
        "Fetched progress snapshot"
    );
    Ok(snapshot)
}

/// [`fetch_snapshot`], with every failure collapsed to `None`.
pub async fn poll(client: &Client, bucket_url: &str) -> Option<Snapshot> {
    match fetch_snapshot(client, bucket_url).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Progress poll failed: {e}");
            None
        }
    }
}

/// Validate a parsed bucket document.
pub fn decode_snapshot(value: &Value) -> Result<Snapshot> {
    let total = value
        .get("total")
        .ok_or_else(|| OverlayError::Payload("missing `total`".to_string()))?
        .as_f64()
        .filter(|t| t.is_finite())
        .ok_or_else(|| OverlayError::Payload("`total` is not a number".to_string()))?;

    Ok(Snapshot {
        total,
        supporters: decode_list(value, "supporters"),
        events: decode_list(value, "events"),
    })
}

/// Decode an optional array, skipping entries that do not fit the shape.
fn decode_list<T>(value: &Value, key: &str) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(items) = value.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!("Skipping malformed `{key}` entry: {e}");
                None
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
