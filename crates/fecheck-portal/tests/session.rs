//! Integration tests for `SessionClient` using wiremock HTTP mocks.

use fecheck_core::Credential;
use fecheck_portal::{
    AuthFailure, AuthMethod, LoginContract, PortalError, SessionClient, SessionSettings,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests that carry no `Authorization` header.
struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

fn credential() -> Credential {
    Credential::new("ops@venue.example", "s3cret")
}

fn session(base_url: &str) -> SessionClient {
    SessionClient::new("bulevar", base_url, &SessionSettings::default())
        .expect("session construction should not fail")
}

#[tokio::test]
async fn json_login_attaches_nested_token_to_later_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/accc_auth/login"))
        .and(body_json(serde_json::json!({
            "email": "ops@venue.example",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 4},
            "tokens": {"access": {"token": "jwt-abc"}, "refresh": {"token": "jwt-r"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/genc_jobsconfig"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {"rows": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let method = client
        .try_authenticate(&LoginContract::json("/api/accc_auth/login"), &credential())
        .await
        .expect("login should succeed");
    assert_eq!(method, AuthMethod::BearerToken);

    let response = client
        .get("/api/genc_jobsconfig?$top=10")
        .await
        .expect("authenticated GET should succeed");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn rejected_login_retains_no_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/accc_auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "token": "should-not-be-used"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let result = client
        .try_authenticate(&LoginContract::json("/api/accc_auth/login"), &credential())
        .await;
    assert_eq!(result, Err(AuthFailure::Rejected { status: 401 }));
    assert_eq!(client.auth_method(), None);

    let response = client.get("/api/ping").await.expect("GET should succeed");
    assert_eq!(response.body, "pong");
}

#[tokio::test]
async fn ok_response_without_any_signal_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/accc_auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "hi"})))
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let ok = client
        .authenticate(&LoginContract::json("/api/accc_auth/login"), &credential())
        .await;
    assert!(!ok);
    let result = client
        .try_authenticate(&LoginContract::json("/api/accc_auth/login"), &credential())
        .await;
    assert_eq!(result, Err(AuthFailure::NoSuccessSignal));
}

#[tokio::test]
async fn success_flag_without_token_is_cookie_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let method = client
        .try_authenticate(&LoginContract::json("/api/login"), &credential())
        .await
        .expect("success flag should count as login");
    assert_eq!(method, AuthMethod::SessionCookie);
}

#[tokio::test]
async fn form_login_warms_up_and_replays_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "fp_session=warm; Path=/")
                .set_body_string("<html>login</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("cookie", "fp_session=warm"))
        .and(body_string_contains("email=ops%40venue.example"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><a href=\"/console/home\">Inicio</a></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let method = client
        .try_authenticate(
            &LoginContract::form("/auth/login", "console/home"),
            &credential(),
        )
        .await
        .expect("landing marker should count as login");
    assert_eq!(method, AuthMethod::SessionCookie);
}

#[tokio::test]
async fn authenticate_any_falls_through_to_second_contract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/login"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/accc_auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = session(&server.uri());
    let method = client
        .authenticate_any(
            &[
                LoginContract::json("/api/v2/login"),
                LoginContract::json("/api/accc_auth/login"),
            ],
            &credential(),
        )
        .await
        .expect("second contract should succeed");
    assert_eq!(method, AuthMethod::BearerToken);
}

#[tokio::test]
async fn candidate_paths_are_probed_in_declared_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/pending/v2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pending/legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let client = session(&server.uri());
    let candidates = vec![
        "/api/pending/v2".to_string(),
        "/api/pending".to_string(),
        "/api/pending/legacy".to_string(),
    ];
    let response = client
        .get_first_success("pending", &candidates)
        .await
        .expect("second candidate should win");
    assert_eq!(response.body, "not json at all");
    assert!(response.json().is_err());
}

#[tokio::test]
async fn exhausted_candidates_report_every_path_tried() {
    let server = MockServer::start().await;

    let client = session(&server.uri());
    let candidates = vec!["/a".to_string(), "/b".to_string()];
    let err = client
        .get_first_success("jobs", &candidates)
        .await
        .expect_err("no mock mounted, every candidate 404s");
    match err {
        PortalError::NoCandidateSucceeded { resource, tried } => {
            assert_eq!(resource, "jobs");
            assert_eq!(tried, candidates);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SessionSettings {
        max_retries: 2,
        backoff_base_ms: 1,
        ..SessionSettings::default()
    };
    let client = SessionClient::new("bulevar", &server.uri(), &settings)
        .expect("session construction should not fail");
    let response = client.get("/api/flaky").await.expect("retry should recover");
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SessionSettings {
        max_retries: 3,
        backoff_base_ms: 1,
        ..SessionSettings::default()
    };
    let client = SessionClient::new("bulevar", &server.uri(), &settings)
        .expect("session construction should not fail");
    let err = client.get("/api/missing").await.expect_err("404 is an error");
    assert!(matches!(err, PortalError::UnexpectedStatus { status: 404, .. }));
}
