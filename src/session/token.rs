//! Anti-forgery token extraction
//!
//! The login form carries a per-session token that must accompany the
//! credential POST. There is no API to fetch it, so it is scraped from the
//! login page markup. The matching is purely textual and exact-format
//! dependent; the dashboard embeds the token in one of two known shapes and
//! nothing more structured is available to rely on.

use crate::session::client::DashboardClient;
use crate::types::RequestSpec;
use crate::{Error, Result};

/// Hidden form input embedding (`<input name="_token" value="...">`)
const VALUE_PATTERN: &str = "name=\"_token\" value=\"";

/// Meta tag embedding (`<meta name="csrf-token" content="...">`)
const META_PATTERN: &str = "name=\"csrf-token\" content=\"";

/// Terminator closing either embedding
const TERMINATOR: &str = "\">";

/// Result of scanning one login page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Token found
    Token(String),
    /// Neither embedding present; the session no longer matches what the
    /// dashboard expects
    Desync,
}

/// Scan login page markup for the anti-forgery token.
///
/// The two embeddings are tried in order; the token runs from the end of
/// the matched prefix to the next `">`. A matched prefix with no terminator
/// is malformed markup and fails outright rather than being retried.
pub fn extract_token(html: &str) -> Result<TokenOutcome> {
    for pattern in [VALUE_PATTERN, META_PATTERN] {
        let Some(start) = html.find(pattern) else {
            continue;
        };

        let rest = &html[start + pattern.len()..];
        let end = rest.find(TERMINATOR).ok_or_else(|| {
            Error::authentication("An error occurred trying to get the authorization token")
        })?;

        return Ok(TokenOutcome::Token(rest[..end].to_string()));
    }

    Ok(TokenOutcome::Desync)
}

/// Fetch a fresh token from the live login page.
///
/// On desync the dashboard is told to log out, which drops its stale state
/// and makes the next login page carry a token again. One retry is enough in
/// practice; the loop is capped anyway so a behavior change upstream cannot
/// recurse forever.
pub(crate) async fn fetch_token(client: &DashboardClient) -> Result<String> {
    let mut retried = false;

    loop {
        let html = client.fetch_text(RequestSpec::get("login")).await?;

        match extract_token(&html)? {
            TokenOutcome::Token(token) => return Ok(token),
            TokenOutcome::Desync if !retried => {
                tracing::warn!("login page carries no token, forcing logout to reset the session");
                client.fetch_text(RequestSpec::get("logout")).await?;
                retried = true;
            }
            TokenOutcome::Desync => {
                return Err(Error::authentication(
                    "login page yielded no authorization token after a session reset",
                ));
            }
        }
    }
}
