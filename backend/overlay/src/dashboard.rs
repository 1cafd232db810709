//! Supporter dashboard: leaderboard and event feed built from the latest
//! snapshot, with supporter names decrypted using the access key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crypto::{AccessKey, EncryptedBlob};
use crate::render::format_total;
use crate::source::Snapshot;

/// Shown when a supporter name cannot be decrypted.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub name: String,
    pub points: f64,
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total: Option<f64>,
    pub total_text: String,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub feed: Vec<FeedEntry>,
}

impl DashboardView {
    /// Dashboard with no data: unknown total, empty tables.
    pub fn unknown() -> Self {
        Self {
            total: None,
            total_text: format_total(None),
            leaderboard: Vec::new(),
            feed: Vec::new(),
        }
    }

    pub fn build(snapshot: &Snapshot, key: &AccessKey, leaderboard_size: usize) -> Self {
        Self {
            total: Some(snapshot.total),
            total_text: format_total(Some(snapshot.total)),
            leaderboard: leaderboard(snapshot, key, leaderboard_size),
            feed: feed(snapshot, key),
        }
    }
}

fn reveal(key: &AccessKey, name: &EncryptedBlob) -> String {
    key.decrypt(name).unwrap_or_else(|_| ANONYMOUS.to_string())
}

/// Supporters merged by name, highest points first, ties by name.
fn leaderboard(snapshot: &Snapshot, key: &AccessKey, size: usize) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for supporter in &snapshot.supporters {
        *totals.entry(reveal(key, &supporter.name)).or_default() += supporter.points;
    }

    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| b.total_cmp(a).then_with(|| a_name.cmp(b_name)));

    ranked
        .into_iter()
        .take(size)
        .enumerate()
        .map(|(i, (name, points))| LeaderboardEntry {
            rank: i + 1,
            name,
            points,
        })
        .collect()
}

/// Events newest first; entries without a readable timestamp go last.
fn feed(snapshot: &Snapshot, key: &AccessKey) -> Vec<FeedEntry> {
    let mut entries: Vec<FeedEntry> = snapshot
        .events
        .iter()
        .map(|event| FeedEntry {
            name: reveal(key, &event.name),
            points: event.points,
            at: event.at.as_deref().and_then(parse_timestamp),
        })
        .collect();

    // Option orders None first, so compare reversed.
    entries.sort_by(|a, b| b.at.cmp(&a.at));
    entries
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
