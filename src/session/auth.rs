//! Login flow
//!
//! Establishes the authenticated session: scrape a fresh anti-forgery token,
//! POST the credentials form, and decide success from the response markup.
//! The authenticated landing page carries an `http-equiv` meta refresh that
//! the login form itself never has, so its presence is the success signal.

use crate::session::client::DashboardClient;
use crate::session::token;
use crate::types::RequestSpec;
use crate::{Error, Result};

/// Substring present only on the authenticated landing page
const AUTHENTICATED_MARKER: &str = "http-equiv";

/// Authenticate the client's credentials against the dashboard.
///
/// Runs exactly once during client construction; a failure here means the
/// client value is never handed out.
pub(crate) async fn authenticate(client: &DashboardClient) -> Result<()> {
    let token = token::fetch_token(client).await?;

    let spec = RequestSpec::post("login")
        .with_param("_token", token)
        .with_param("email", client.credentials().email.clone())
        .with_param("password", client.credentials().password.clone());

    let body = client.fetch_text(spec).await?;

    if body.contains(AUTHENTICATED_MARKER) {
        tracing::info!("dashboard session established");
        Ok(())
    } else {
        Err(Error::authentication(
            "The given combination of username and password is incorrect",
        ))
    }
}
