use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

use crate::presentation::state::AppState;

pub const LIVENESS_MESSAGE: &str = "murmur transcription backend is running";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: String,
}

pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime: state.started_at.elapsed().as_secs_f64(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}
