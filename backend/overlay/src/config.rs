//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use goal_scroller::AnimationTiming;

use crate::errors::{OverlayError, Result};

const PRODUCTION_POLL_SECS: u64 = 15;
const DEV_POLL_SECS: u64 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    /// Overlay URL as shared with the streamer; carries the `key` query parameter.
    pub overlay_url: String,
    /// JSON file holding the goal list and the encrypted bucket URL
    pub overlay_file: PathBuf,
    /// Port for the HTTP server
    pub api_port: u16,
    /// Development mode polls every second instead of every 15 seconds
    pub dev_mode: bool,
    /// How often (in seconds) to poll the progress bucket
    pub poll_interval_secs: u64,
    /// How often (in seconds) to check the overlay file for changes
    pub config_poll_secs: u64,
    /// CSS transition duration of one scroll phase
    pub transition_ms: u64,
    /// Extra time added to each phase timer
    pub transition_margin_ms: u64,
    /// Number of supporters listed on the dashboard leaderboard
    pub leaderboard_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dev_mode = parse_bool(&env_var("DEV_MODE").unwrap_or_else(|_| "false".to_string()))
            .ok_or_else(|| OverlayError::Config("Invalid DEV_MODE".to_string()))?;
        let default_poll = if dev_mode {
            DEV_POLL_SECS
        } else {
            PRODUCTION_POLL_SECS
        };

        Ok(Config {
            overlay_url: env_var("OVERLAY_URL").map_err(|_| {
                OverlayError::Config("OVERLAY_URL environment variable is required".to_string())
            })?,
            overlay_file: env_var("OVERLAY_FILE")
                .unwrap_or_else(|_| "./overlay.json".to_string())
                .into(),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid API_PORT".to_string()))?,
            dev_mode,
            poll_interval_secs: env_var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| default_poll.to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid POLL_INTERVAL_SECS".to_string()))?,
            config_poll_secs: env_var("CONFIG_POLL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid CONFIG_POLL_SECS".to_string()))?,
            transition_ms: env_var("TRANSITION_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid TRANSITION_MS".to_string()))?,
            transition_margin_ms: env_var("TRANSITION_MARGIN_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid TRANSITION_MARGIN_MS".to_string()))?,
            leaderboard_size: env_var("LEADERBOARD_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| OverlayError::Config("Invalid LEADERBOARD_SIZE".to_string()))?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn config_poll_interval(&self) -> Duration {
        Duration::from_secs(self.config_poll_secs.max(1))
    }

    pub fn timing(&self) -> AnimationTiming {
        AnimationTiming {
            transition: Duration::from_millis(self.transition_ms),
            margin: Duration::from_millis(self.transition_margin_ms),
        }
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| OverlayError::Config(format!("Missing env var: {key}")))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
