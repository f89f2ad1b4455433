pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use crate::config::{ChatProvider, ConversationConfig};
use crate::error::{ConversationError, ConversationResult};
use crate::session::Exchange;

/// Prior turns handed to the chat provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatContext {
    pub history: Vec<Exchange>,
}

/// Free-text responder used when no voice command handler applies
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn generate_chat_response(
        &self,
        message: &str,
        language: &str,
        context: &ChatContext,
    ) -> ConversationResult<String>;
}

/// Chat message in the role/content shape both providers accept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

pub(crate) fn system_prompt(language: &str) -> String {
    format!(
        "You are the voice assistant of a hospital patient portal. \
Answer briefly and in plain language suitable for being read aloud. \
Do not give diagnoses; suggest booking an appointment when medical advice is needed. \
Reply in the language with code '{}'.",
        language
    )
}

/// System prompt, prior exchanges in order, then the new user message
pub(crate) fn build_messages(
    message: &str,
    language: &str,
    context: &ChatContext,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(context.history.len() * 2 + 2);
    messages.push(ChatMessage::new("system", system_prompt(language)));
    for exchange in &context.history {
        messages.push(ChatMessage::new("user", exchange.message.clone()));
        messages.push(ChatMessage::new("assistant", exchange.response.clone()));
    }
    messages.push(ChatMessage::new("user", message));
    messages
}

pub(crate) fn map_request_error(error: reqwest::Error, timeout_secs: u64) -> ConversationError {
    if error.is_timeout() {
        ConversationError::Timeout(timeout_secs)
    } else {
        ConversationError::Network(error)
    }
}

/// Decode a provider reply body; malformed JSON is a `Serialization` error
pub(crate) fn parse_reply_body<T: DeserializeOwned>(body: &str) -> ConversationResult<T> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> ConversationResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ConversationError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Create a chat responder based on configuration
pub fn create_responder(
    config: &ConversationConfig,
) -> ConversationResult<Arc<dyn ChatResponder>> {
    match &config.provider {
        ChatProvider::Ollama { .. } => Ok(Arc::new(ollama::OllamaChatResponder::new(config)?)),
        ChatProvider::OpenAi { .. } => Ok(Arc::new(openai::OpenAiChatResponder::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_messages_orders_history_before_message() {
        let context = ChatContext {
            history: vec![Exchange::new("hi", "hello"), Exchange::new("book", "sure")],
        };
        let messages = build_messages("thanks", "en", &context);

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user", "assistant", "user"]);
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[4].content, "sure");
        assert_eq!(messages[5].content, "thanks");
    }

    #[test]
    fn test_malformed_reply_body_is_serialization_error() {
        let err = parse_reply_body::<ChatMessage>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ConversationError::Serialization(_)));
        assert_eq!(err.kind(), "serialization");
    }

    #[test]
    fn test_system_prompt_names_language() {
        assert!(system_prompt("es").contains("'es'"));
    }

    #[test]
    fn test_create_responder_for_each_provider() {
        let ollama = ConversationConfig::default();
        assert!(create_responder(&ollama).is_ok());

        let openai = ConversationConfig {
            provider: ChatProvider::OpenAi {
                api_url: "https://api.openai.com/v1".to_string(),
                api_key: "test-key".to_string(),
                model: "gpt-4o-mini".to_string(),
            },
            ..Default::default()
        };
        assert!(create_responder(&openai).is_ok());
    }
}
