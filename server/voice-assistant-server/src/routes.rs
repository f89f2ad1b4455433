use axum::{
    routing::{get, post},
    Router,
};
use crate::{
    handlers::{conversation, health},
    server::VoiceAssistantServer,
};

/// Create health check routes
pub fn health_routes() -> Router<VoiceAssistantServer> {
    Router::new().route("/health", get(health::health_check))
}

/// Create voice conversation routes
pub fn voice_routes() -> Router<VoiceAssistantServer> {
    Router::new()
        .route("/voice/conversation", post(conversation::process_message))
        .route("/voice/conversation/:session_id", get(conversation::get_session))
}

/// Create all application routes
pub fn create_routes() -> Router<VoiceAssistantServer> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", voice_routes())
}
