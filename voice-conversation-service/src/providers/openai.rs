/// OpenAI chat completions provider
///
/// Use only under a signed BAA; prefer Ollama for deployments that keep PHI
/// on-premises.
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

pub struct OpenAiChatResponder {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

impl OpenAiChatResponder {
    pub fn new(config: &ConversationConfig) -> ConversationResult<Self> {
        let ChatProvider::OpenAi { api_url, api_key, model } = &config.provider else {
            return Err(ConversationError::Config(
                "OpenAI responder requires an openai provider config".to_string(),
            ));
        };

        if api_key.trim().is_empty() {
            return Err(ConversationError::Config("OpenAI API key is empty".to_string()));
        }

        Ok(Self {
            client: build_http_client(config.request_timeout_secs)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
            model: model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.request_timeout_secs,
        })
    }
}

#[async_trait]
impl ChatResponder for OpenAiChatResponder {
    async fn generate_chat_response(
        &self,
        message: &str,
        language: &str,
        context: &ChatContext,
    ) -> ConversationResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(message, language, context),
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        debug!(
            model = %self.model,
            turns = context.history.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversationError::Provider(format!(
                "OpenAI returned {}: {}",
                status, body
            )));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;
        let body: ChatCompletionResponse = parse_reply_body(&raw)?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ConversationError::Provider("OpenAI returned no completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_config(api_key: &str) -> ConversationConfig {
        ConversationConfig {
            provider: ChatProvider::OpenAi {
                api_url: "https://api.openai.com/v1/".to_string(),
                api_key: api_key.to_string(),
                model: "gpt-4o-mini".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let responder = OpenAiChatResponder::new(&openai_config("k")).unwrap();
        assert_eq!(responder.api_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        assert!(OpenAiChatResponder::new(&openai_config("  ")).is_err());
    }

    #[test]
    fn test_completion_parsing() {
        let body: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"Sunny."},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content, "Sunny.");
    }
}
