use std::sync::Arc;
use std::time::Instant;
use voice_conversation_service::{ConversationConfig, ConversationResult, VoiceConversationManager};

/// Voice assistant server state
#[derive(Clone)]
pub struct VoiceAssistantServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Conversation manager shared by all requests
    pub conversations: Arc<VoiceConversationManager>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "RustCare Voice Assistant".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// `CORS_ALLOWED_ORIGINS` is a comma separated list; `*` allows any origin
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty() && *origin != "*")
                .map(String::from)
                .collect();
        }
        config
    }
}

impl VoiceAssistantServer {
    /// Build the conversation manager from `conversation` and wrap it
    pub fn new(
        config: ServerConfig,
        conversation: &ConversationConfig,
    ) -> ConversationResult<Self> {
        let manager = VoiceConversationManager::from_config(conversation)?;
        Ok(Self::with_manager(config, Arc::new(manager)))
    }

    pub fn with_manager(
        config: ServerConfig,
        conversations: Arc<VoiceConversationManager>,
    ) -> Self {
        Self {
            config,
            conversations,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
