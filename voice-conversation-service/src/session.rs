use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dialogue state assigned to a session on first contact
pub const INITIAL_STATE: &str = "greeting";

/// Context key holding the caller's preferred language
pub const LANGUAGE_KEY: &str = "language";

/// One request/response pair. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    pub fn new(message: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Conversation state for one voice assistant session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub state: String,
    pub context: Map<String, Value>,
    pub history: Vec<Exchange>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: INITIAL_STATE.to_string(),
            context: Map::new(),
            history: Vec::new(),
        }
    }

    /// Preferred language from context, if the caller ever supplied one
    pub fn language(&self) -> Option<&str> {
        self.context
            .get(LANGUAGE_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }

    /// Fold caller-echoed state into this session.
    ///
    /// Only `context` keys and the `state` tag are taken from the caller.
    /// Unknown top-level keys land in `context`. `history` is owned by the
    /// store and never overwritten from outside.
    pub fn merge(&mut self, external: &ConversationState) {
        if let Some(state) = external.state.as_deref().filter(|s| !s.is_empty()) {
            self.state = state.to_string();
        }
        if let Some(context) = &external.context {
            for (key, value) in context {
                self.context.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &external.extra {
            self.context.insert(key.clone(), value.clone());
        }
    }

    /// Append an exchange and evict the oldest entries beyond `limit`
    pub fn record_exchange(&mut self, exchange: Exchange, limit: usize) {
        self.history.push(exchange);
        if self.history.len() > limit {
            let overflow = self.history.len() - limit;
            self.history.drain(..overflow);
        }
    }

    /// Last `turns` exchanges, oldest first
    pub fn recent_history(&self, turns: usize) -> &[Exchange] {
        let start = self.history.len().saturating_sub(turns);
        &self.history[start..]
    }

    /// Snapshot handed back to the caller for echoing on the next turn
    pub fn snapshot(&self) -> ConversationState {
        ConversationState {
            state: Some(self.state.clone()),
            context: Some(self.context.clone()),
            history: Some(self.history.clone()),
            extra: Map::new(),
        }
    }
}

/// Conversation state as it travels over the wire.
///
/// Every field is optional so that whatever a client echoes back can be
/// accepted, and so an empty object is a valid value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Exchange>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationState {
    pub fn history_len(&self) -> usize {
        self.history.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new("s1");
        assert_eq!(session.state, "greeting");
        assert!(session.context.is_empty());
        assert!(session.history.is_empty());
        assert_eq!(session.language(), None);
    }

    #[test]
    fn test_record_exchange_trims_oldest_first() {
        let mut session = Session::new("s1");
        for i in 0..12 {
            session.record_exchange(Exchange::new(format!("m{}", i), "r"), 10);
        }
        assert_eq!(session.history.len(), 10);
        assert_eq!(session.history[0].message, "m2");
        assert_eq!(session.history[9].message, "m11");
    }

    #[test]
    fn test_recent_history_shorter_than_requested() {
        let mut session = Session::new("s1");
        session.record_exchange(Exchange::new("hello", "hi"), 10);
        assert_eq!(session.recent_history(5).len(), 1);
        assert_eq!(session.recent_history(0).len(), 0);
    }

    #[test]
    fn test_merge_never_touches_history() {
        let mut session = Session::new("s1");
        session.record_exchange(Exchange::new("hello", "hi"), 10);

        let external: ConversationState = serde_json::from_value(json!({
            "state": "VOICE_COMMAND:APPOINTMENT",
            "context": {"language": "es"},
            "history": [],
            "patient_ref": "p-1"
        }))
        .unwrap();
        session.merge(&external);

        assert_eq!(session.history.len(), 1);
        assert_eq!(session.state, "VOICE_COMMAND:APPOINTMENT");
        assert_eq!(session.language(), Some("es"));
        assert_eq!(session.context.get("patient_ref"), Some(&json!("p-1")));
    }

    #[test]
    fn test_merge_overwrites_same_context_key() {
        let mut session = Session::new("s1");
        session.context.insert("language".into(), json!("en"));
        session.context.insert("channel".into(), json!("widget"));

        let external: ConversationState =
            serde_json::from_value(json!({"language": "fr"})).unwrap();
        session.merge(&external);

        assert_eq!(session.language(), Some("fr"));
        assert_eq!(session.context.get("channel"), Some(&json!("widget")));
        assert_eq!(session.state, "greeting");
    }

    #[test]
    fn test_empty_state_serializes_as_empty_object() {
        let value = serde_json::to_value(ConversationState::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    proptest! {
        #[test]
        fn history_length_is_min_of_turns_and_limit(turns in 0usize..40, limit in 1usize..15) {
            let mut session = Session::new("p");
            for i in 0..turns {
                session.record_exchange(Exchange::new(format!("m{}", i), "r"), limit);
                prop_assert!(session.history.len() <= limit);
            }
            prop_assert_eq!(session.history.len(), turns.min(limit));
            if let Some(last) = session.history.last() {
                prop_assert_eq!(&last.message, &format!("m{}", turns - 1));
            }
        }
    }
}
