//! Session store mapping generated ids to conversation handles.
//!
//! The store is an explicit value the front end owns and injects into its
//! handlers rather than a process-wide global, so it can later be swapped
//! for a bounded/evicting or distributed store without touching the
//! conversation core. Each handle
//! sits behind its own mutex, which is what enforces the single-writer
//! rule: one `ask` cannot interleave with navigation on the same handle,
//! while different handles run fully in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use bardo_client::ChatBackend;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::conversation::Conversation;

struct SessionEntry<B> {
    conversation: Arc<Mutex<Conversation<B>>>,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

/// Id-keyed registry of conversation handles.
pub struct SessionStore<B> {
    sessions: RwLock<HashMap<Uuid, SessionEntry<B>>>,
}

impl<B> SessionStore<B>
where
    B: ChatBackend,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a conversation and hand back its generated id.
    pub async fn create(&self, conversation: Conversation<B>) -> Uuid {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let entry = SessionEntry {
            conversation: Arc::new(Mutex::new(conversation)),
            created_at: now,
            last_used: now,
        };

        self.sessions.write().await.insert(id, entry);
        info!("created session {id}");
        id
    }

    /// Look up a handle, marking the session as used.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Conversation<B>>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Utc::now();
        Some(Arc::clone(&entry.conversation))
    }

    /// Drop a session. Returns false when the id was unknown.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!("removed session {id}");
        }
        removed
    }

    /// Ids of all live sessions, oldest first.
    pub async fn list(&self) -> Vec<Uuid> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<(Uuid, DateTime<Utc>)> = sessions
            .iter()
            .map(|(id, entry)| (*id, entry.created_at))
            .collect();
        ids.sort_by_key(|(_, created_at)| *created_at);
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// When the session was last handed out, if it exists.
    pub async fn last_used(&self, id: &Uuid) -> Option<DateTime<Utc>> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.last_used)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl<B> Default for SessionStore<B>
where
    B: ChatBackend,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bardo_client::{ClientError, DecodedAnswer, DecodedTurn, SessionReference};

    struct OneAnswerBackend;

    #[async_trait]
    impl ChatBackend for OneAnswerBackend {
        async fn ask(
            &self,
            prompt: &str,
            _reference: &SessionReference,
        ) -> Result<DecodedTurn, ClientError> {
            Ok(DecodedTurn {
                conversation_id: "c".to_string(),
                response_id: "r".to_string(),
                answers: vec![DecodedAnswer {
                    choice_id: "rc".to_string(),
                    content: format!("echo: {prompt}"),
                }],
            })
        }
    }

    #[tokio::test]
    async fn create_get_remove_lifecycle() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let id = store.create(Conversation::new(OneAnswerBackend)).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.list().await, vec![id]);

        let handle = store.get(&id).await.unwrap();
        {
            let mut conversation = handle.lock().await;
            conversation.ask("hello").await.unwrap();
            assert_eq!(conversation.current_answer(), "echo: hello");
        }

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn get_marks_the_session_as_used() {
        let store = SessionStore::new();
        let id = store.create(Conversation::new(OneAnswerBackend)).await;

        let before = store.last_used(&id).await.unwrap();
        let _handle = store.get(&id).await.unwrap();
        let after = store.last_used(&id).await.unwrap();
        assert!(after >= before);

        let unknown = Uuid::now_v7();
        assert!(store.last_used(&unknown).await.is_none());
    }

    #[tokio::test]
    async fn handles_are_independent() {
        let store = SessionStore::new();
        let first = store.create(Conversation::new(OneAnswerBackend)).await;
        let second = store.create(Conversation::new(OneAnswerBackend)).await;
        assert_ne!(first, second);

        let handle = store.get(&first).await.unwrap();
        handle.lock().await.ask("only first").await.unwrap();

        let untouched = store.get(&second).await.unwrap();
        assert_eq!(untouched.lock().await.answer_count(), 0);
    }
}
