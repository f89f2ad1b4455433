use std::sync::Arc;
use tracing::warn;
use crate::intent::{ClassifiedIntent, VoiceCommand, CHAT_TAG};
use crate::messages;
use crate::providers::{ChatContext, ChatResponder};
use crate::session::Session;

/// What a strategy produced for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReply {
    pub action: String,
    pub message: String,
    pub show_doctors: Option<bool>,
    pub start_analysis: Option<String>,
}

impl StrategyReply {
    fn guided(intent: &ClassifiedIntent, message: &str) -> Self {
        Self {
            action: intent.tag(),
            message: message.to_string(),
            show_doctors: None,
            start_analysis: None,
        }
    }

    fn chat(message: String) -> Self {
        Self {
            action: CHAT_TAG.to_string(),
            message,
            show_doctors: None,
            start_analysis: None,
        }
    }
}

/// Picks the response for a classified intent.
///
/// Appointment, face analysis and doctor listing have guided replies.
/// Every other intent, hair analysis, medical records and profile included,
/// goes to the free-text chat responder.
pub struct ResponseStrategySelector {
    responder: Arc<dyn ChatResponder>,
    context_turns: usize,
    default_language: String,
}

impl ResponseStrategySelector {
    pub fn new(
        responder: Arc<dyn ChatResponder>,
        context_turns: usize,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            responder,
            context_turns,
            default_language: default_language.into(),
        }
    }

    pub async fn select_and_respond(
        &self,
        message: &str,
        session: &Session,
        intent: &ClassifiedIntent,
    ) -> StrategyReply {
        match intent.command {
            Some(VoiceCommand::Appointment) => StrategyReply {
                show_doctors: Some(true),
                ..StrategyReply::guided(intent, messages::APPOINTMENT_GUIDANCE)
            },
            Some(VoiceCommand::FaceAnalysis) => StrategyReply {
                start_analysis: Some("face".to_string()),
                ..StrategyReply::guided(intent, messages::FACE_ANALYSIS_GUIDANCE)
            },
            Some(VoiceCommand::Doctors) => StrategyReply {
                show_doctors: Some(true),
                ..StrategyReply::guided(intent, messages::DOCTORS_GUIDANCE)
            },
            _ => self.chat_fallback(message, session).await,
        }
    }

    async fn chat_fallback(&self, message: &str, session: &Session) -> StrategyReply {
        let language = self.language_for(session);
        let context = ChatContext {
            history: session.recent_history(self.context_turns).to_vec(),
        };

        match self
            .responder
            .generate_chat_response(message, language, &context)
            .await
        {
            Ok(text) => StrategyReply::chat(text),
            Err(e) => {
                warn!(
                    session_id = %session.session_id,
                    error_kind = e.kind(),
                    error = %e,
                    "Chat responder failed, answering with apology"
                );
                StrategyReply::chat(messages::apology(language).to_string())
            }
        }
    }

    pub fn language_for<'a>(&'a self, session: &'a Session) -> &'a str {
        session.language().unwrap_or(&self.default_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversationError;
    use crate::intent::IntentClassifier;
    use crate::providers::MockChatResponder;
    use crate::session::Exchange;
    use mockall::predicate::eq;
    use serde_json::json;

    fn selector(responder: MockChatResponder) -> ResponseStrategySelector {
        ResponseStrategySelector::new(Arc::new(responder), 5, "en")
    }

    fn unused_responder() -> MockChatResponder {
        let mut responder = MockChatResponder::new();
        responder.expect_generate_chat_response().never();
        responder
    }

    #[tokio::test]
    async fn test_appointment_is_guided() {
        let selector = selector(unused_responder());
        let intent = IntentClassifier::classify("book an appointment");

        let reply = selector
            .select_and_respond("book an appointment", &Session::new("s1"), &intent)
            .await;

        assert_eq!(reply.action, "VOICE_COMMAND:APPOINTMENT");
        assert_eq!(reply.message, messages::APPOINTMENT_GUIDANCE);
        assert_eq!(reply.show_doctors, Some(true));
        assert_eq!(reply.start_analysis, None);
    }

    #[tokio::test]
    async fn test_face_analysis_starts_analysis() {
        let selector = selector(unused_responder());
        let intent = IntentClassifier::classify("analyze face");

        let reply = selector
            .select_and_respond("analyze face", &Session::new("s1"), &intent)
            .await;

        assert_eq!(reply.action, "VOICE_COMMAND:FACE_ANALYSIS");
        assert_eq!(reply.start_analysis.as_deref(), Some("face"));
        assert_eq!(reply.show_doctors, None);
    }

    #[tokio::test]
    async fn test_doctors_shows_doctors() {
        let selector = selector(unused_responder());
        let intent = IntentClassifier::classify("available doctors");

        let reply = selector
            .select_and_respond("available doctors", &Session::new("s1"), &intent)
            .await;

        assert_eq!(reply.action, "VOICE_COMMAND:DOCTORS");
        assert_eq!(reply.message, messages::DOCTORS_GUIDANCE);
        assert_eq!(reply.show_doctors, Some(true));
    }

    #[tokio::test]
    async fn test_unwired_buckets_fall_through_to_chat() {
        for message in ["hair check", "show my records", "open my profile"] {
            let mut responder = MockChatResponder::new();
            responder
                .expect_generate_chat_response()
                .times(1)
                .returning(|_, _, _| Ok("From the assistant".to_string()));
            let selector = selector(responder);
            let intent = IntentClassifier::classify(message);
            assert!(intent.detected(), "{}", message);

            let reply = selector
                .select_and_respond(message, &Session::new("s1"), &intent)
                .await;

            assert_eq!(reply.action, "CHAT");
            assert_eq!(reply.message, "From the assistant");
        }
    }

    #[tokio::test]
    async fn test_chat_receives_language_and_recent_history() {
        let mut session = Session::new("s1");
        session.context.insert("language".into(), json!("es"));
        for i in 0..8 {
            session.record_exchange(Exchange::new(format!("m{}", i), "r"), 10);
        }

        let mut responder = MockChatResponder::new();
        responder
            .expect_generate_chat_response()
            .with(eq("hola"), eq("es"), mockall::predicate::always())
            .times(1)
            .returning(|_, _, context| {
                assert_eq!(context.history.len(), 5);
                assert_eq!(context.history[0].message, "m3");
                Ok("¡Hola!".to_string())
            });

        let reply = selector(responder)
            .select_and_respond("hola", &session, &ClassifiedIntent::chat())
            .await;

        assert_eq!(reply.message, "¡Hola!");
    }

    #[tokio::test]
    async fn test_chat_failure_becomes_apology() {
        let mut session = Session::new("s1");
        session.context.insert("language".into(), json!("fr"));

        let mut responder = MockChatResponder::new();
        responder
            .expect_generate_chat_response()
            .returning(|_, _, _| Err(ConversationError::Provider("upstream 500".to_string())));

        let reply = selector(responder)
            .select_and_respond("bonjour", &session, &ClassifiedIntent::chat())
            .await;

        assert_eq!(reply.action, "CHAT");
        assert_eq!(reply.message, messages::apology("fr"));
    }
}
