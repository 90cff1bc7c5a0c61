use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::extract::DelimiterPair;
use crate::session::Session;

/// In-memory session store. Sessions live for the process lifetime; there
/// is no eviction, matching the single-conversation scale this service
/// targets.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, delimiters: DelimiterPair) -> Arc<Session> {
        let session = Arc::new(Session::new(delimiters));
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id(), session.clone());
        info!("Created session {} ({} active)", session.id(), sessions.len());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> DelimiterPair {
        DelimiterPair::new("[RESUME_START]", "[RESUME_END]").unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let registry = SessionRegistry::new();
        let session = registry.create(markers()).await;

        let fetched = registry.get(session.id()).await.unwrap();
        assert_eq!(fetched.id(), session.id());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = registry.create(markers()).await;
        let b = registry.create(markers()).await;
        assert_ne!(a.id(), b.id());

        a.append_message(crate::models::message::Role::User, "only in a")
            .await;
        assert_eq!(a.transcript_snapshot().await.len(), 1);
        assert!(b.transcript_snapshot().await.is_empty());
    }
}
