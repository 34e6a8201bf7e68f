//! Authenticated dashboard client
//!
//! [`DashboardClient`] owns the cookie-backed HTTP session and is the single
//! choke point for all authenticated traffic: every higher-level operation
//! funnels through [`DashboardClient::send_request`]. Construction logs in
//! eagerly, so a client value in hand is always an authenticated one.

use crate::config::Settings;
use crate::modules::{Clients, Payments, Payouts, Products};
use crate::session::auth;
use crate::session::fingerprint::{FingerprintProvider, OnlineMetrixCollector};
use crate::session::store::{CookieBackend, FileBackend, PersistentJar};
use crate::types::{Company, Credentials, Method, Payload, RequestSpec, decode_envelope};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// Authenticated client for one dashboard account
#[derive(Debug)]
pub struct DashboardClient {
    settings: Settings,
    credentials: Credentials,
    http: reqwest::Client,
    fingerprint: Arc<dyn FingerprintProvider>,
}

impl DashboardClient {
    /// Log in to the dashboard and return an authenticated client.
    ///
    /// The session cookie store lives in the configured session directory,
    /// in a file keyed by a stable hash of the email, and is reused across
    /// processes pointed at the same directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the credentials are rejected
    /// or no anti-forgery token could be recovered from the login page;
    /// transport faults surface as [`Error::Network`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use pagalo_dashboard_client::{Credentials, DashboardClient, Settings};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let credentials = Credentials::new("merchant@example.gt", "secret");
    /// let client = DashboardClient::login(credentials, Settings::default()).await?;
    ///
    /// let user = client.current_user().await?;
    /// println!("user: {:?}", user);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(credentials: Credentials, settings: Settings) -> Result<Self> {
        let backend = FileBackend::for_identity(&settings.session_dir, &credentials.email);
        Self::login_with_backend(credentials, settings, Box::new(backend)).await
    }

    /// Log in using an explicit cookie backend.
    ///
    /// Tests substitute an in-memory backend here; production callers
    /// normally go through [`DashboardClient::login`].
    pub async fn login_with_backend(
        credentials: Credentials,
        settings: Settings,
        backend: Box<dyn CookieBackend>,
    ) -> Result<Self> {
        settings.validate()?;

        let jar = Arc::new(PersistentJar::new(backend));

        // The dashboard's certificate chain does not validate everywhere,
        // so verification is deliberately off for this one host. Redirects
        // stay manual: success detection reads the login response body.
        let http = reqwest::Client::builder()
            .user_agent(&settings.user_agent)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::none())
            .cookie_provider(jar)
            .build()?;

        let fingerprint: Arc<dyn FingerprintProvider> =
            Arc::new(OnlineMetrixCollector::new(&settings)?);

        let client = Self {
            settings,
            credentials,
            http,
            fingerprint,
        };

        auth::authenticate(&client).await?;
        Ok(client)
    }

    /// Perform one dashboard call.
    ///
    /// Encoding follows the declared headers: a JSON content type sends the
    /// params as a JSON body regardless of method; otherwise GET params go
    /// into the query string and POST/PUT params into a form body. The
    /// persisted cookie store is read before the send and rewritten after
    /// the response, so session continuity never depends on this process
    /// staying alive.
    ///
    /// Non-2xx statuses are not errors here; callers read the payload shape.
    /// The only hard failure is a transport fault.
    pub async fn send_request(&self, spec: &RequestSpec) -> Result<Payload> {
        let url = format!("{}{}", self.settings.endpoint_base(), spec.path);
        let mut request = self.http.request(spec.method.into(), &url);

        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if spec.wants_json_body() {
            request = request.json(&spec.params);
        } else if !spec.params.is_empty() {
            request = match spec.method {
                Method::Get => request.query(&spec.form_pairs()),
                Method::Post | Method::Put => request.form(&spec.form_pairs()),
            };
        }

        tracing::debug!(path = %spec.path, method = ?spec.method, raw = spec.raw, "dispatching dashboard request");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, bytes = body.len(), "dashboard response received");

        if spec.raw {
            Ok(Payload::Raw(body))
        } else {
            Ok(Payload::Data(decode_envelope(&body)))
        }
    }

    /// Dispatch in decoded mode and return the envelope data
    pub(crate) async fn fetch_data(&self, spec: RequestSpec) -> Result<Option<Value>> {
        Ok(self.send_request(&spec).await?.into_data())
    }

    /// Dispatch in raw mode and return the body text
    pub(crate) async fn fetch_text(&self, spec: RequestSpec) -> Result<String> {
        Ok(self
            .send_request(&spec.raw())
            .await?
            .into_text()
            .unwrap_or_default())
    }

    /// Record of the authenticated user
    pub async fn current_user(&self) -> Result<Option<Value>> {
        self.fetch_data(RequestSpec::get("api/miV2/myUser")).await
    }

    /// Company attached to the authenticated user
    pub async fn company(&self) -> Result<Company> {
        let user = self
            .current_user()
            .await?
            .ok_or_else(|| Error::unknown("dashboard returned no user record"))?;

        let empresa = user
            .get("empresa")
            .cloned()
            .ok_or_else(|| Error::unknown("user record has no company attached"))?;

        Ok(serde_json::from_value(empresa)?)
    }

    /// Plan configuration of the account
    pub async fn plan(&self) -> Result<Option<Value>> {
        self.fetch_data(RequestSpec::get("api/mi/configuracionPlan"))
            .await
    }

    /// Client (customer) operations
    pub fn clients(&self) -> Clients<'_> {
        Clients::new(self)
    }

    /// Payment operations
    pub fn payments(&self) -> Payments<'_> {
        Payments::new(self)
    }

    /// Payout operations
    pub fn payouts(&self) -> Payouts<'_> {
        Payouts::new(self)
    }

    /// Product operations
    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    /// Settings this client was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn fingerprint(&self) -> &dyn FingerprintProvider {
        self.fingerprint.as_ref()
    }
}
