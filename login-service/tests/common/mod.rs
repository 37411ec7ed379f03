#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use auth_core::password::encode;
use auth_core::password::hash_password;
use auth_core::Authenticator;
use auth_core::Clock;
use auth_core::HashParameters;
use auth_core::ServiceTokenCache;
use auth_core::TokenIssuer;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Duration;
use login_service::config::CookieConfig;
use login_service::domain::login::service::LoginService;
use login_service::inbound::http::router::create_router;
use login_service::outbound::directory::GraphQlUserDirectory;
use serde_json::json;
use serde_json::Value;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ISSUER: &str = "auth";
pub const COOKIE_NAME: &str = "auth";
pub const COOKIE_DOMAIN: &str = "example.com";

/// Cheap parameters so tests do not spend seconds hashing.
pub fn test_params() -> HashParameters {
    HashParameters {
        memory_cost_kib: 64,
        time_cost: 1,
        parallelism: 1,
        salt_length: 16,
        key_length: 32,
    }
}

pub fn stored_hash(password: &str) -> String {
    let params = test_params();
    let raw = hash_password(&params, password.as_bytes()).expect("Failed to hash password");
    encode(&params, &raw).into_string()
}

/// How the fake directory answers every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryMode {
    Normal,
    Failing,
    QueryErrors,
}

#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
    pub email: Option<String>,
}

struct DirectoryState {
    users: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    mode: DirectoryMode,
}

/// In-process GraphQL directory answering the email lookup.
#[derive(Clone)]
pub struct FakeDirectory {
    pub endpoint: String,
    state: Arc<Mutex<DirectoryState>>,
}

impl FakeDirectory {
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(DirectoryState {
            users: HashMap::new(),
            requests: Vec::new(),
            mode: DirectoryMode::Normal,
        }));

        let router = Router::new()
            .route("/v1/graphql", post(graphql))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Directory error");
        });

        Self {
            endpoint: format!("http://127.0.0.1:{}/v1/graphql", port),
            state,
        }
    }

    /// Register a user record; repeated emails produce duplicate matches.
    pub fn add_user(&self, id: &str, email: &str, password: &str, admin: bool) {
        let record = json!({
            "id": id,
            "password": stored_hash(password),
            "admin": admin,
            "slug": id.to_lowercase(),
            "display": format!("User {}", id),
        });
        self.add_record(email, record);
    }

    pub fn add_record(&self, email: &str, record: Value) {
        self.state
            .lock()
            .unwrap()
            .users
            .entry(email.to_string())
            .or_default()
            .push(record);
    }

    pub fn set_mode(&self, mode: DirectoryMode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

async fn graphql(
    State(state): State<Arc<Mutex<DirectoryState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let email = body["variables"]["email"].as_str().map(str::to_string);

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        cookie: header_value(header::COOKIE),
        authorization: header_value(header::AUTHORIZATION),
        email: email.clone(),
    });

    match state.mode {
        DirectoryMode::Failing => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        DirectoryMode::QueryErrors => Json(json!({
            "errors": [{ "message": "field 'user' not found in type: 'query_root'" }]
        }))
        .into_response(),
        DirectoryMode::Normal => {
            let users = email
                .and_then(|e| state.users.get(&e).cloned())
                .unwrap_or_default();
            Json(json!({ "data": { "user": users } })).into_response()
        }
    }
}

/// Test application that spawns a real server in front of a fake directory
pub struct TestApp {
    pub address: String,
    pub directory: FakeDirectory,
    pub api_client: reqwest::Client,
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_issuer(TokenIssuer::new(SECRET, ISSUER)).await
    }

    /// Spawn the application with tokens stamped by `clock`
    pub async fn spawn_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::spawn_with_issuer(TokenIssuer::with_clock(SECRET, ISSUER, clock)).await
    }

    async fn spawn_with_issuer(issuer: TokenIssuer) -> Self {
        let directory = FakeDirectory::spawn().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let issuer = Arc::new(issuer);
        let authenticator = Arc::new(Authenticator::new(Arc::clone(&issuer), None));
        let service_tokens = Arc::new(
            ServiceTokenCache::new(Arc::clone(&issuer), Duration::days(7), Duration::minutes(5))
                .expect("Failed to create service token cache"),
        );

        let user_directory = Arc::new(
            GraphQlUserDirectory::new(
                directory.endpoint.clone(),
                COOKIE_NAME,
                std::time::Duration::from_secs(5),
            )
            .expect("Failed to create directory client"),
        );

        let login_service = Arc::new(LoginService::new(
            user_directory,
            authenticator,
            service_tokens,
            Duration::minutes(15),
        ));

        let router = create_router(
            login_service,
            CookieConfig {
                name: COOKIE_NAME.to_string(),
                domain: COOKIE_DOMAIN.to_string(),
                secure: true,
            },
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            directory,
            api_client: reqwest::Client::new(),
            issuer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to submit login credentials
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
