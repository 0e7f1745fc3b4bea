// src/error.rs

//! Unified error handling for the feed watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed (includes watermark write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed (DNS, connect, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint answered with a non-success status
    #[error("feed returned HTTP {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The report container itself could not be opened
    #[error("unreadable feed document: {0}")]
    UnreadableFeed(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification sink could not be reached
    #[error("notification sink unavailable: {0}")]
    SinkUnavailable(String),

    /// Notification sink refused the message
    #[error("notification sink rejected message: HTTP {status}")]
    SinkRejected { status: reqwest::StatusCode },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unreadable-feed error.
    pub fn unreadable_feed(message: impl fmt::Display) -> Self {
        Self::UnreadableFeed(message.to_string())
    }

    /// Create a sink-unavailable error.
    pub fn sink_unavailable(message: impl fmt::Display) -> Self {
        Self::SinkUnavailable(message.to_string())
    }
}
