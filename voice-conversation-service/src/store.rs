use crate::error::ConversationResult;
use crate::session::Session;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Storage backend for conversation sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the stored session, creating and storing a fresh one on first use
    async fn get_or_create(&self, session_id: &str) -> ConversationResult<Session>;

    /// Return the stored session without creating one
    async fn get(&self, session_id: &str) -> ConversationResult<Option<Session>>;

    /// Upsert by `session_id`
    async fn save(&self, session: Session) -> ConversationResult<()>;

    /// Number of stored sessions
    async fn len(&self) -> ConversationResult<usize>;
}

/// Process-local session store. Sessions live until the process exits.
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> ConversationResult<Session> {
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        Ok(entry.value().clone())
    }

    async fn get(&self, session_id: &str) -> ConversationResult<Option<Session>> {
        Ok(self.sessions.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, session: Session) -> ConversationResult<()> {
        self.sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn len(&self) -> ConversationResult<usize> {
        Ok(self.sessions.len())
    }
}

/// Per-session async locks.
///
/// Holding the guard for a session id serializes the read-modify-write of
/// that session while other sessions proceed in parallel. Idle entries are
/// dropped on release.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .value()
            .clone();
        let guard = lock.lock_owned().await;
        SessionGuard {
            locks: self,
            session_id: session_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of session ids with a live lock entry
    pub fn active(&self) -> usize {
        self.locks.len()
    }

    fn release(&self, session_id: &str) {
        // The map holds one reference; any other holder is waiting or running.
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Drop the mutex guard first so its Arc reference is gone before the check.
        self.guard.take();
        self.locks.release(&self.session_id);
    }
}
