//! Error types shared across the countdown client

use thiserror::Error;

/// Errors raised while configuring the widget or talking to the backend
#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed JSON from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },

    #[error("{url} returned no usable deadline")]
    NoDeadline { url: String },

    #[error("All {0} deadline sources failed")]
    AllSourcesFailed(usize),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

pub type Result<T> = std::result::Result<T, TimerError>;
