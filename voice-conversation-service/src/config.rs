use serde::{Deserialize, Serialize};
use crate::error::{ConversationError, ConversationResult};

/// Most recent exchanges kept per session
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Exchanges handed to the chat provider for continuity
pub const DEFAULT_CONTEXT_TURNS: usize = 5;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Chat provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatProvider {
    /// Ollama local LLMs (self-hosted, fully private) - PREFERRED
    Ollama {
        api_url: String,
        model: String,
    },
    /// OpenAI chat completions (requires BAA for PHI)
    #[serde(rename = "openai")]
    OpenAi {
        api_url: String,
        api_key: String,
        model: String,
    },
}

impl ChatProvider {
    /// Provider name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ChatProvider::Ollama { .. } => "ollama",
            ChatProvider::OpenAi { .. } => "openai",
        }
    }
}

/// Voice conversation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversationConfig {
    pub provider: ChatProvider,
    pub history_limit: usize,
    pub context_turns: usize,
    pub default_language: String,
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            provider: ChatProvider::Ollama {
                api_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
            },
            history_limit: DEFAULT_HISTORY_LIMIT,
            context_turns: DEFAULT_CONTEXT_TURNS,
            default_language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: 30,
            max_tokens: 300,
        }
    }
}

impl ConversationConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ConversationResult<Self> {
        let defaults = Self::default();

        let history_limit = std::env::var("CONVERSATION_HISTORY_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.history_limit);

        let context_turns = std::env::var("CONVERSATION_CONTEXT_TURNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.context_turns);

        let default_language = std::env::var("CONVERSATION_DEFAULT_LANGUAGE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_language);

        let request_timeout_secs = std::env::var("CHAT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let max_tokens = std::env::var("CHAT_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let provider = match std::env::var("CHAT_PROVIDER") {
            Ok(provider_type) => Self::provider_from_env(&provider_type)?,
            // Default to Ollama (self-hosted, no PHI leaves the network)
            Err(_) => defaults.provider,
        };

        let config = Self {
            provider,
            history_limit,
            context_turns,
            default_language,
            request_timeout_secs,
            max_tokens,
        };
        config.validate()?;
        Ok(config)
    }

    fn provider_from_env(provider_type: &str) -> ConversationResult<ChatProvider> {
        match provider_type.to_lowercase().as_str() {
            "ollama" => Ok(ChatProvider::Ollama {
                api_url: std::env::var("OLLAMA_API_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model: std::env::var("OLLAMA_MODEL")
                    .unwrap_or_else(|_| "llama3".to_string()),
            }),
            "openai" => {
                let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                    ConversationError::Config(
                        "OPENAI_API_KEY must be set when CHAT_PROVIDER=openai".to_string(),
                    )
                })?;
                Ok(ChatProvider::OpenAi {
                    api_url: std::env::var("OPENAI_API_URL")
                        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                    api_key,
                    model: std::env::var("OPENAI_MODEL")
                        .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                })
            }
            other => Err(ConversationError::Config(format!(
                "Unknown chat provider: {}",
                other
            ))),
        }
    }

    /// Reject settings that would break the history invariants
    pub fn validate(&self) -> ConversationResult<()> {
        if self.history_limit == 0 {
            return Err(ConversationError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.history_limit > DEFAULT_HISTORY_LIMIT {
            return Err(ConversationError::Config(format!(
                "history_limit must not exceed {}",
                DEFAULT_HISTORY_LIMIT
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConversationError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
