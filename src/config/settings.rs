//! Configuration settings structure
//!
//! Defines the settings structure and loading logic for the dashboard client.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base origin of the Pagalo dashboard
pub const DEFAULT_ENDPOINT: &str = "https://app.pagalocard.com/";

/// Base origin of the anti-fraud data collection host
pub const DEFAULT_FINGERPRINT_ENDPOINT: &str = "https://h.online-metrix.net/fp/";

/// Main configuration settings for the dashboard client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dashboard origin all relative paths are appended to
    pub endpoint: String,
    /// Anti-fraud vendor origin used by the fingerprint collector
    pub fingerprint_endpoint: String,
    /// Directory holding the persisted cookie store files
    pub session_dir: PathBuf,
    /// User-Agent header presented to the dashboard
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fingerprint_endpoint: DEFAULT_FINGERPRINT_ENDPOINT.to_string(),
            session_dir: default_session_dir(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_6) AppleWebKit/605.1.15 \
                         (KHTML, like Gecko) Version/12.0.2 Safari/605.1.15"
                .to_string(),
        }
    }
}

/// Platform cache directory, falling back to the system temp directory
fn default_session_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pagalo-dashboard-client")
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables over the defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        if let Ok(endpoint) = std::env::var("PAGALO_ENDPOINT") {
            settings.endpoint = endpoint;
        }

        if let Ok(dir) = std::env::var("PAGALO_SESSION_DIR") {
            settings.session_dir = PathBuf::from(dir);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("invalid config file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Override the dashboard endpoint (unit tests point this at a mock server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the anti-fraud vendor endpoint
    pub fn with_fingerprint_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.fingerprint_endpoint = endpoint.into();
        self
    }

    /// Override the cookie store directory
    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.endpoint)
            .map_err(|e| crate::Error::config(format!("invalid endpoint: {}", e)))?;
        url::Url::parse(&self.fingerprint_endpoint)
            .map_err(|e| crate::Error::config(format!("invalid fingerprint endpoint: {}", e)))?;

        Ok(())
    }

    /// Dashboard endpoint with a guaranteed trailing slash, so relative
    /// paths always append instead of replacing the last segment
    pub fn endpoint_base(&self) -> String {
        if self.endpoint.ends_with('/') {
            self.endpoint.clone()
        } else {
            format!("{}/", self.endpoint)
        }
    }

    /// Fingerprint endpoint with a guaranteed trailing slash
    pub fn fingerprint_base(&self) -> String {
        if self.fingerprint_endpoint.ends_with('/') {
            self.fingerprint_endpoint.clone()
        } else {
            format!("{}/", self.fingerprint_endpoint)
        }
    }
}
