//! Session layer integration tests
//!
//! Drives the full login, token-scrape and dispatch behavior against a mock
//! dashboard.

mod common;

use common::*;
use pagalo_dashboard_client::session::{FileBackend, MemoryBackend};
use pagalo_dashboard_client::{DashboardClient, Error, RequestSpec};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_posts_scraped_token_and_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_INPUT))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("_token=tok-abc123"))
        .and(body_string_contains("email=merchant%40example.gt"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LANDING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = login(&server).await;
    assert_eq!(client.settings().endpoint_base(), format!("{}/", server.uri()));
}

#[tokio::test]
async fn login_accepts_meta_token_embedding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_META))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("_token=tok-meta789"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LANDING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    login(&server).await;
}

#[tokio::test]
async fn rejected_credentials_fail_construction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_INPUT))
        .mount(&server)
        .await;

    // No http-equiv marker: the dashboard re-rendered the login form
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REJECTED_PAGE))
        .mount(&server)
        .await;

    let result = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(MemoryBackend::new()),
    )
    .await;

    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn desync_forces_one_logout_then_recovers() {
    let server = MockServer::start().await;

    // First login page carries no token; after the forced logout the next
    // fetch does. Mocks match in mount order, with the first one exhausted
    // after a single use.
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESYNC_PAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_INPUT))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("_token=tok-abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LANDING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    login(&server).await;
}

#[tokio::test]
async fn persistent_desync_fails_after_single_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESYNC_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(MemoryBackend::new()),
    )
    .await;

    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn truncated_token_embedding_is_fatal() {
    let server = MockServer::start().await;

    // Matched prefix, no terminator: malformed markup, not a desync
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<input name="_token" value="cut"#),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(MemoryBackend::new()),
    )
    .await;

    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn envelope_without_datos_is_no_data() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/miV2/myUser"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .mount(&server)
        .await;

    let client = login(&server).await;
    let user = client.current_user().await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn decoded_envelope_yields_datos() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_user(&server).await;

    let client = login(&server).await;

    let user = client.current_user().await.unwrap().unwrap();
    assert_eq!(user["nombre"], "Merchant");

    let company = client.company().await.unwrap();
    assert_eq!(company.id, 77);
}

#[tokio::test]
async fn raw_mode_returns_body_text_verbatim() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/reporte"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>reporte</html>"))
        .mount(&server)
        .await;

    let client = login(&server).await;
    let payload = client
        .send_request(&RequestSpec::get("reporte").raw())
        .await
        .unwrap();

    assert_eq!(payload.into_text().unwrap(), "<html>reporte</html>");
}

#[tokio::test]
async fn non_success_status_is_not_an_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/mi/configuracionPlan"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&server)
        .await;

    let client = login(&server).await;
    // The dispatcher stays lenient; the body simply has no envelope
    let plan = client.plan().await.unwrap();
    assert!(plan.is_none());
}

#[tokio::test]
async fn session_cookies_replay_across_sequential_calls() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();

    mount_login(&server).await;

    // First call must replay the login cookie and picks up a second one
    Mock::given(method("GET"))
        .and(path("/api/mi/configuracionPlan"))
        .and(header("cookie", "laravel_session=sess1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"datos":{"plan":"pro"}}"#)
                .insert_header("set-cookie", "XSRF-TOKEN=tok2; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Second call carries both cookies
    Mock::given(method("GET"))
        .and(path("/api/mi/liquidaciones"))
        .and(header("cookie", "XSRF-TOKEN=tok2; laravel_session=sess1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"datos":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let backend = FileBackend::for_identity(dir.path(), "merchant@example.gt");
    let store_path = backend.path().to_path_buf();

    let client = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(backend),
    )
    .await
    .unwrap();

    client.plan().await.unwrap();
    let after_first = std::fs::read_to_string(&store_path).unwrap();

    client.payouts().all().await.unwrap();
    let after_second = std::fs::read_to_string(&store_path).unwrap();

    // The store only grows for the same session
    assert!(after_first.contains("laravel_session"));
    assert!(after_second.contains("laravel_session"));
    assert!(after_second.contains("XSRF-TOKEN"));
}

#[tokio::test]
async fn cookie_store_survives_client_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();

    mount_login(&server).await;

    let first = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(FileBackend::for_identity(dir.path(), "merchant@example.gt")),
    )
    .await
    .unwrap();
    drop(first);

    // A second client over the same identity presents the persisted session
    // cookie already on its first request
    Mock::given(method("GET"))
        .and(path("/api/mi/liquidaciones"))
        .and(header("cookie", "laravel_session=sess1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"datos":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let second = DashboardClient::login_with_backend(
        test_credentials(),
        test_settings(&server),
        Box::new(FileBackend::for_identity(dir.path(), "merchant@example.gt")),
    )
    .await
    .unwrap();

    second.payouts().all().await.unwrap();
}
