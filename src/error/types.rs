//! Error type definitions
//!
//! Defines the error taxonomy surfaced to callers of the dashboard client.

use thiserror::Error;

/// Main error type for the dashboard client
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials rejected, or the anti-forgery token could not be recovered
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Card number failed the Luhn check or the expiration date is malformed
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cookie store read/write errors
    #[error("Cookie store error: {0}")]
    CookieStore(String),

    /// Network/HTTP client errors (DNS, connect, TLS handshake)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Uncategorized failures
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a new invalid card error
    pub fn invalid_card(msg: impl Into<String>) -> Self {
        Self::InvalidCard(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new cookie store error
    pub fn cookie_store(msg: impl Into<String>) -> Self {
        Self::CookieStore(msg.into())
    }

    /// Create a new unknown error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
