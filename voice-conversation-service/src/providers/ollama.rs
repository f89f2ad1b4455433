/// Ollama Provider - Fully private, self-hosted chat
///
/// Ollama runs open-weight LLMs inside your own infrastructure, so patient
/// messages never leave the network.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::{ChatProvider, ConversationConfig};
use crate::error::{ConversationError, ConversationResult};
use crate::providers::{
    build_http_client, build_messages, map_request_error, parse_reply_body, ChatContext,
    ChatMessage, ChatResponder,
};

pub struct OllamaChatResponder {
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<ChatMessage>,
}

impl OllamaChatResponder {
    pub fn new(config: &ConversationConfig) -> ConversationResult<Self> {
        let ChatProvider::Ollama { api_url, model } = &config.provider else {
            return Err(ConversationError::Config(
                "Ollama responder requires an ollama provider config".to_string(),
            ));
        };

        Ok(Self {
            client: build_http_client(config.request_timeout_secs)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.request_timeout_secs,
        })
    }
}

#[async_trait]
impl ChatResponder for OllamaChatResponder {
    async fn generate_chat_response(
        &self,
        message: &str,
        language: &str,
        context: &ChatContext,
    ) -> ConversationResult<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: build_messages(message, language, context),
            stream: false,
            options: OllamaOptions {
                num_predict: self.max_tokens,
            },
        };

        debug!(
            model = %self.model,
            turns = context.history.len(),
            "Sending chat request to Ollama"
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.api_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversationError::Provider(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;
        let body: OllamaChatResponse = parse_reply_body(&raw)?;

        body.message
            .map(|m| m.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ConversationError::Provider("Ollama returned an empty reply".to_string())
            })
    }
}
