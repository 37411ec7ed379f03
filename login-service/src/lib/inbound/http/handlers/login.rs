use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::config::CookieConfig;
use crate::domain::login::errors::LoginError;
use crate::domain::login::models::Credentials;
use crate::domain::login::models::EmailAddress;
use crate::domain::login::models::LoginOutcome;
use crate::domain::login::ports::LoginServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<
    (
        AppendHeaders<[(HeaderName, String); 1]>,
        ApiSuccess<LoginResponseData>,
    ),
    ApiError,
> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // An unparsable email cannot belong to anyone.
    let email = EmailAddress::new(body.email).map_err(|_| ApiError::invalid_credentials())?;

    let outcome = state
        .login_service
        .login(Credentials::new(email.clone(), body.password))
        .await
        .map_err(|e| {
            log_failure(&email, &e);
            ApiError::from(e)
        })?;

    tracing::info!(user_id = %outcome.user_id, roles = ?outcome.roles, "Login succeeded");

    let cookie = session_cookie(&state.cookie, &outcome);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        ApiSuccess::new(StatusCode::OK, (&outcome).into()),
    ))
}

fn log_failure(email: &EmailAddress, err: &LoginError) {
    if err.is_rejection() {
        tracing::info!(email = %email, reason = %err, "Login rejected");
    } else {
        tracing::error!(email = %email, error = %err, "Login failed");
    }
}

/// `Set-Cookie` value carrying the user token, expiring with it.
pub fn session_cookie(config: &CookieConfig, outcome: &LoginOutcome) -> String {
    let mut cookie = format!(
        "{}={}; Domain={}",
        config.name, outcome.token.token, config.domain
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str("; HttpOnly; SameSite=Lax; Expires=");
    cookie.push_str(
        &outcome
            .token
            .expires_at
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string(),
    );
    cookie
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub id: String,
    pub roles: Vec<String>,
    pub slug: String,
    pub display: String,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            id: outcome.user_id.clone(),
            roles: outcome.roles.clone(),
            slug: outcome.slug.clone(),
            display: outcome.display_name.clone(),
        }
    }
}
