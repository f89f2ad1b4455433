use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use logger_redacted::PiiRedactor;
use crate::config::ConversationConfig;
use crate::error::ConversationResult;
use crate::intent::IntentClassifier;
use crate::messages;
use crate::providers::{create_responder, ChatResponder};
use crate::session::{ConversationState, Exchange, Session, LANGUAGE_KEY};
use crate::store::{InMemorySessionStore, SessionLocks, SessionStore};
use crate::strategy::{ResponseStrategySelector, StrategyReply};

/// Action reported when a turn could not be processed
pub const ERROR_ACTION: &str = "ERROR";

/// Reply to one voice assistant turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub action: String,
    pub message: String,
    /// Echo this back verbatim on the next call
    pub conversation_state: ConversationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_doctors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_analysis: Option<String>,
}

impl ConversationResponse {
    fn from_reply(reply: StrategyReply, conversation_state: ConversationState) -> Self {
        Self {
            action: reply.action,
            message: reply.message,
            conversation_state,
            show_doctors: reply.show_doctors,
            start_analysis: reply.start_analysis,
        }
    }

    pub fn is_error(&self) -> bool {
        self.action == ERROR_ACTION
    }
}

/// Stateful voice conversation manager.
///
/// Keeps no conversation data itself: every turn reads the session from the
/// store, answers, and writes the session back. Turns for the same session id
/// are serialized; different sessions run concurrently.
pub struct VoiceConversationManager {
    store: Arc<dyn SessionStore>,
    selector: ResponseStrategySelector,
    locks: SessionLocks,
    redactor: PiiRedactor,
    history_limit: usize,
    default_language: String,
}

impl VoiceConversationManager {
    pub fn new(
        config: &ConversationConfig,
        store: Arc<dyn SessionStore>,
        responder: Arc<dyn ChatResponder>,
    ) -> Self {
        Self {
            store,
            selector: ResponseStrategySelector::new(
                responder,
                config.context_turns,
                config.default_language.clone(),
            ),
            locks: SessionLocks::new(),
            redactor: PiiRedactor::default(),
            history_limit: config.history_limit,
            default_language: config.default_language.clone(),
        }
    }

    /// In-memory store and the configured chat provider
    pub fn from_config(config: &ConversationConfig) -> ConversationResult<Self> {
        config.validate()?;
        let responder = create_responder(config)?;
        info!(
            provider = config.provider.name(),
            history_limit = config.history_limit,
            "Voice conversation manager ready"
        );
        Ok(Self::new(config, Arc::new(InMemorySessionStore::new()), responder))
    }

    /// Process one user message. Never fails: errors become an `ERROR` reply
    /// and leave the stored session untouched.
    pub async fn process_input(
        &self,
        message: &str,
        session_id: &str,
        external_state: Option<ConversationState>,
    ) -> ConversationResponse {
        let _guard = self.locks.acquire(session_id).await;

        let outcome = self
            .run_turn(message, session_id, external_state.as_ref())
            .await;

        match outcome {
            Ok(response) => response,
            Err(e) => {
                error!(
                    session_id = %session_id,
                    error_kind = e.kind(),
                    error = %e,
                    "Voice conversation turn failed"
                );
                let language = external_state
                    .as_ref()
                    .and_then(language_hint)
                    .unwrap_or(self.default_language.as_str());
                let apology = messages::apology(language).to_string();
                ConversationResponse {
                    action: ERROR_ACTION.to_string(),
                    message: apology,
                    conversation_state: external_state.unwrap_or_default(),
                    show_doctors: None,
                    start_analysis: None,
                }
            }
        }
    }

    async fn run_turn(
        &self,
        message: &str,
        session_id: &str,
        external_state: Option<&ConversationState>,
    ) -> ConversationResult<ConversationResponse> {
        let mut session = self.store.get_or_create(session_id).await?;
        if let Some(external) = external_state {
            session.merge(external);
        }

        let intent = IntentClassifier::classify(message);
        debug!(
            session_id = %session_id,
            intent = %intent.tag(),
            input = %self.redactor.redact(message),
            "Classified voice input"
        );

        let reply = self.selector.select_and_respond(message, &session, &intent).await;

        session.record_exchange(Exchange::new(message, reply.message.clone()), self.history_limit);
        let conversation_state = session.snapshot();
        self.store.save(session).await?;

        info!(
            session_id = %session_id,
            action = %reply.action,
            history_len = conversation_state.history_len(),
            "Voice conversation turn completed"
        );

        Ok(ConversationResponse::from_reply(reply, conversation_state))
    }

    /// Stored session, if any turn has been processed for `session_id`
    pub async fn session(&self, session_id: &str) -> ConversationResult<Option<Session>> {
        self.store.get(session_id).await
    }

    pub async fn session_count(&self) -> ConversationResult<usize> {
        self.store.len().await
    }
}

fn language_hint(state: &ConversationState) -> Option<&str> {
    state
        .context
        .as_ref()
        .and_then(|context| context.get(LANGUAGE_KEY))
        .or_else(|| state.extra.get(LANGUAGE_KEY))
        .and_then(serde_json::Value::as_str)
}
