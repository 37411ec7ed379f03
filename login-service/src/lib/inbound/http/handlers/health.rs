use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::login::ports::LoginServicePort;
use crate::inbound::http::router::AppState;

/// Liveness of the login path.
///
/// Turns 503 for good once the service token can no longer be issued, so the
/// orchestrator stops routing logins here.
pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthData> {
    if state.login_service.is_healthy() {
        ApiSuccess::new(StatusCode::OK, HealthData { status: "ok" })
    } else {
        ApiSuccess::new(
            StatusCode::SERVICE_UNAVAILABLE,
            HealthData {
                status: "unavailable",
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
}
