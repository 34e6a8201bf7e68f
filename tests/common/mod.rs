//! Common test utilities and helpers
//!
//! Shared fixtures for driving a client against a mock dashboard.

use pagalo_dashboard_client::session::MemoryBackend;
use pagalo_dashboard_client::{Credentials, DashboardClient, Settings};
use std::sync::Once;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Initialize test tracing once per binary; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Login page embedding the token as a hidden form input (pattern A)
pub const LOGIN_PAGE_INPUT: &str = concat!(
    r#"<html><body><form method="POST" action="/login">"#,
    r#"<input type="hidden" name="_token" value="tok-abc123">"#,
    r#"</form></body></html>"#,
);

/// Login page embedding the token as a meta tag (pattern B)
pub const LOGIN_PAGE_META: &str =
    r#"<html><head><meta name="csrf-token" content="tok-meta789"></head></html>"#;

/// Login page with no token embedding at all (desynchronized session)
pub const DESYNC_PAGE: &str = "<html><body>redirecting to dashboard...</body></html>";

/// Authenticated landing page; only this carries the `http-equiv` marker
pub const LANDING_PAGE: &str = concat!(
    r#"<html><head><meta http-equiv="refresh" content="0; url=/dashboard">"#,
    r#"</head></html>"#,
);

/// Login form echoed back on bad credentials
pub const REJECTED_PAGE: &str = concat!(
    r#"<html><body><form method="POST" action="/login">"#,
    r#"<p>These credentials do not match our records.</p>"#,
    r#"</form></body></html>"#,
);

/// User envelope carrying the company used by the resource modules
pub const USER_BODY: &str = concat!(
    r#"{"datos":{"id":12,"nombre":"Merchant","empresa":"#,
    r#"{"id":77,"identidad_empresa":"1234567-8","nombre":"Acme GT"}}}"#,
);

/// Settings pointed at a mock server, fingerprint endpoint included
pub fn test_settings(server: &MockServer) -> Settings {
    Settings::default()
        .with_endpoint(format!("{}/", server.uri()))
        .with_fingerprint_endpoint(format!("{}/fp/", server.uri()))
}

/// Test credentials
pub fn test_credentials() -> Credentials {
    Credentials::new("merchant@example.gt", "secret")
}

/// Mount a healthy login flow: token page on GET, landing page on POST
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_INPUT))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LANDING_PAGE)
                .insert_header("set-cookie", "laravel_session=sess1; Path=/; HttpOnly"),
        )
        .mount(server)
        .await;
}

/// Mount the user endpoint backing `company()`
pub async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/miV2/myUser"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USER_BODY))
        .mount(server)
        .await;
}

/// Log in against the mock server with an in-memory cookie store
pub async fn login(server: &MockServer) -> DashboardClient {
    init_tracing();

    DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(server),
        Box::new(MemoryBackend::new()),
    )
    .await
    .expect("login against mock server should succeed")
}
