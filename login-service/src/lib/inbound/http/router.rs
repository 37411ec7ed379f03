use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use crate::config::CookieConfig;
use crate::domain::login::service::LoginService;
use crate::outbound::directory::GraphQlUserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<LoginService<GraphQlUserDirectory>>,
    pub cookie: Arc<CookieConfig>,
}

pub fn create_router(
    login_service: Arc<LoginService<GraphQlUserDirectory>>,
    cookie: CookieConfig,
) -> Router {
    let state = AppState {
        login_service,
        cookie: Arc::new(cookie),
    };

    // Request headers are left out of the span: they carry session cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/api/auth/login", post(login))
        .route("/health", get(health))
        .layer(trace_layer)
        .with_state(state)
}
