mod common;

use auth_core::SERVICE_SUBJECT;
use common::DirectoryMode;
use common::TestApp;
use common::COOKIE_DOMAIN;
use common::COOKIE_NAME;
use reqwest::header::SET_COOKIE;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("U1", "nicola@example.com", "pass_word!", false);

    let response = app.login("nicola@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("Missing Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{}=", COOKIE_NAME)));
    assert!(cookie.contains(&format!("Domain={}", COOKIE_DOMAIN)));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Expires="));

    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap();
    let claims = app.issuer.verify(&token).expect("Invalid user token");
    assert_eq!(claims.sub, "U1");
    assert_eq!(claims.roles, vec!["user"]);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"]["id"], "U1");
    assert_eq!(body["data"]["roles"], json!(["user"]));
    assert_eq!(body["data"]["slug"], "u1");
    assert_eq!(body["data"]["display"], "User U1");
}

#[tokio::test]
async fn test_login_admin_roles() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("A1", "admin@example.com", "pass_word!", true);

    let response = app.login("admin@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["roles"], json!(["admin", "user"]));
}

#[tokio::test]
async fn test_login_presents_service_token_to_directory() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("U1", "nicola@example.com", "pass_word!", false);

    app.login("nicola@example.com", "pass_word!").await;
    app.login("nicola@example.com", "pass_word!").await;

    let requests = app.directory.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].email.as_deref(), Some("nicola@example.com"));

    let authorization = requests[0].authorization.clone().expect("Missing bearer");
    let token = authorization.strip_prefix("Bearer ").unwrap();
    assert_eq!(
        requests[0].cookie.as_deref(),
        Some(format!("{}={}", COOKIE_NAME, token).as_str())
    );

    let claims = app.issuer.verify(token).expect("Invalid service token");
    assert_eq!(claims.sub, SERVICE_SUBJECT.to_string());
    assert_eq!(claims.roles, vec!["auth"]);

    // Cached between logins.
    assert_eq!(requests[0].authorization, requests[1].authorization);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("U1", "nicola@example.com", "pass_word!", false);

    let response = app.login("nicola@example.com", "wrong_password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("U1", "nicola@example.com", "pass_word!", false);

    let unknown = app.login("nobody@example.com", "pass_word!").await;
    let wrong = app.login("nicola@example.com", "wrong_password").await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown: serde_json::Value = unknown.json().await.unwrap();
    let wrong: serde_json::Value = wrong.json().await.unwrap();
    assert_eq!(unknown, wrong);
    assert_eq!(unknown["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app.login("not-an-email", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.directory.requests().is_empty());
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "email": "nicola@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 400);
}

#[tokio::test]
async fn test_login_duplicate_directory_records() {
    let app = TestApp::spawn().await;
    app.directory
        .add_user("U1", "twice@example.com", "pass_word!", false);
    app.directory
        .add_user("U2", "twice@example.com", "pass_word!", false);

    let response = app.login("twice@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Internal server error");
}

#[tokio::test]
async fn test_login_incompatible_stored_hash() {
    let app = TestApp::spawn().await;
    app.directory.add_record(
        "legacy@example.com",
        json!({
            "id": "L1",
            "password": "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW",
            "admin": false,
            "slug": "legacy",
            "display": "Legacy",
        }),
    );

    let response = app.login("legacy@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_directory_unavailable() {
    let app = TestApp::spawn().await;
    app.directory.set_mode(DirectoryMode::Failing);

    let response = app.login("nicola@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_unhealthy_after_service_token_failure() {
    use std::sync::Arc;
    use std::sync::Mutex;

    use auth_core::Clock;
    use chrono::DateTime;
    use chrono::Duration;
    use chrono::Utc;

    // Every reading jumps past any expiry computed from the previous one.
    struct RunawayClock(Mutex<DateTime<Utc>>);

    impl Clock for RunawayClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.0.lock().unwrap();
            *now += Duration::days(30);
            *now
        }
    }

    let app = TestApp::spawn_with_clock(Arc::new(RunawayClock(Mutex::new(Utc::now())))).await;
    app.directory
        .add_user("U1", "nicola@example.com", "pass_word!", false);

    let response = app.login("nicola@example.com", "pass_word!").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.directory.requests().is_empty());

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "unavailable");
}
