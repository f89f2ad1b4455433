use axum::{extract::State, response::Json as ResponseJson};
use serde::{Deserialize, Serialize};
use crate::{error::ApiResult, server::VoiceAssistantServer};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub active_sessions: usize,
}

/// Health check handler
pub async fn health_check(
    State(server): State<VoiceAssistantServer>,
) -> ApiResult<ResponseJson<HealthResponse>> {
    let active_sessions = server.conversations.session_count().await?;

    Ok(ResponseJson(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        active_sessions,
    }))
}
