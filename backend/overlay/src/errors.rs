//! Application-wide error types.

use goal_scroller::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid key")]
    InvalidKey,

    #[error("Decryption error: {0}")]
    Decrypt(String),

    #[error("Payload error: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
