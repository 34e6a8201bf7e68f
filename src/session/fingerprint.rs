//! Device fingerprint collection
//!
//! Before a card payment the dashboard's anti-fraud vendor expects a device
//! data-collection sequence: a fixed series of fire-and-forget GETs against
//! its profiling endpoints, tied together by a millisecond session id. The
//! calls are unauthenticated and use their own short-lived client; the
//! dashboard session is never involved.

use crate::config::Settings;
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;

/// Merchant identifier baked into the profiling session id
const MERCHANT_ID: &str = "visanetgt_jupiter";

/// Organization identifier of the anti-fraud vendor account
const ORGANIZATION_ID: &str = "k8vif92e";

/// Provider of device fingerprint session ids
///
/// Behind a trait so payment tests can stub the collection sequence instead
/// of reaching the vendor.
#[async_trait]
pub trait FingerprintProvider: Send + Sync + std::fmt::Debug {
    /// Run the collection sequence and return the device session id
    async fn collect(&self) -> Result<i64>;
}

/// Collector driving the vendor's real profiling endpoints
#[derive(Debug)]
pub struct OnlineMetrixCollector {
    http: reqwest::Client,
    base: String,
}

impl OnlineMetrixCollector {
    /// Build a collector from the configured vendor endpoint
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&settings.user_agent)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            http,
            base: settings.fingerprint_base(),
        })
    }
}

#[async_trait]
impl FingerprintProvider for OnlineMetrixCollector {
    async fn collect(&self) -> Result<i64> {
        let session_id = Utc::now().timestamp_millis();

        // Fixed probe sequence; the vendor correlates them by session id
        let probes = [
            format!(
                "clear.png?org_id={}&session_id={}{}&m=1",
                ORGANIZATION_ID, MERCHANT_ID, session_id
            ),
            format!(
                "clear.png?org_id={}&session_id={}{}&m=2",
                ORGANIZATION_ID, MERCHANT_ID, session_id
            ),
            format!(
                "fp.swf?org_id={}&session_id={}{}",
                ORGANIZATION_ID, MERCHANT_ID, session_id
            ),
            format!(
                "tags.js?org_id={}&session_id={}{}",
                ORGANIZATION_ID, MERCHANT_ID, session_id
            ),
        ];

        for probe in &probes {
            let url = format!("{}{}", self.base, probe);
            let result = self
                .http
                .get(&url)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", "en-US,en;q=0.5")
                .header("Upgrade-Insecure-Requests", "1")
                .send()
                .await;

            // Best effort: a failed probe never blocks the payment
            if let Err(e) = result {
                tracing::debug!(probe = %probe, "fingerprint probe failed: {}", e);
            }
        }

        tracing::debug!(session_id, "device fingerprint collected");
        Ok(session_id)
    }
}
