//! Error type for startup and configuration failures.
//!
//! Request handling never produces these; HTTP-level failures are answered
//! with [`HTTPError`](crate::utils::http_helpers::HTTPError).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error loading configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("failed to set up metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to serialize: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
