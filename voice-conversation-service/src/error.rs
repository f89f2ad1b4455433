use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Session store error: {0}")]
    Store(String),

    #[error("Chat provider timed out after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConversationError {
    /// Short machine-readable kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ConversationError::Config(_) => "config",
            ConversationError::Provider(_) => "provider",
            ConversationError::Store(_) => "store",
            ConversationError::Timeout(_) => "timeout",
            ConversationError::Network(_) => "network",
            ConversationError::Serialization(_) => "serialization",
        }
    }
}

pub type ConversationResult<T> = Result<T, ConversationError>;
