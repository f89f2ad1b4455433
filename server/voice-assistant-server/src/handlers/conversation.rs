use axum::{
    extract::{Path, State},
    response::Json as ResponseJson,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use voice_conversation_service::{ConversationResponse, ConversationState, Session};
use crate::{
    error::{ApiError, ApiResult},
    server::VoiceAssistantServer,
};

/// Inbound voice widget turn
#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    pub message: String,
    /// Minted when absent; clients keep the returned id
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, alias = "state")]
    pub conversation_state: Option<ConversationState>,
}

/// Turn reply plus the session it belongs to
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationReply {
    pub session_id: String,
    #[serde(flatten)]
    pub response: ConversationResponse,
}

/// Process one voice assistant turn
pub async fn process_message(
    State(server): State<VoiceAssistantServer>,
    Json(request): Json<ConversationRequest>,
) -> ApiResult<ResponseJson<ConversationReply>> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation("message must not be empty"));
    }

    let session_id = match request.session_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            info!(session_id = %id, "Started new voice session");
            id
        }
    };

    let response = server
        .conversations
        .process_input(&request.message, &session_id, request.conversation_state)
        .await;

    Ok(ResponseJson(ConversationReply {
        session_id,
        response,
    }))
}

/// Stored state for a session
pub async fn get_session(
    State(server): State<VoiceAssistantServer>,
    Path(session_id): Path<String>,
) -> ApiResult<ResponseJson<Session>> {
    server
        .conversations
        .session(&session_id)
        .await?
        .map(ResponseJson)
        .ok_or_else(|| ApiError::not_found("session"))
}
