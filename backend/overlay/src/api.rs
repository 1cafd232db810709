//! Axum HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tokio::sync::watch;

use crate::driver::Published;

pub struct ApiState {
    pub published: watch::Receiver<Published>,
}

impl ApiState {
    fn current(&self) -> Published {
        self.published.borrow().clone()
    }
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /overlay`
///
/// The goal list as an HTML fragment with `data-state` / `data-move`
/// attributes and `order` styles.
pub async fn overlay_html(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Html(state.current().html)
}

/// `GET /overlay/state`
pub async fn overlay_state(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.current().overlay)
}

/// `GET /dashboard`
///
/// Total, leaderboard and event feed.
pub async fn dashboard(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.current().dashboard)
}
