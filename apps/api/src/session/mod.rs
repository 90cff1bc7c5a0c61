// Interview sessions: per-conversation transcript, artifact state and
// single-writer streaming discipline.
// Extraction is recomputed from the full transcript after every mutation,
// never patched incrementally, so the artifact is always a pure function
// of the transcript.

pub mod handlers;
pub mod registry;
pub mod transcript;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::extract::{ArtifactState, DelimiterPair};
use crate::models::message::{Message, Role};
use crate::session::transcript::Transcript;

/// One interview conversation and its derived artifact.
///
/// `inner` guards the transcript/artifact pair so readers always observe a
/// state the extractor actually produced. `writer` is a separate permit:
/// at most one streaming reply may mutate the transcript at a time, and the
/// owned guard travels into the response stream so a client disconnect
/// releases it automatically.
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    delimiters: DelimiterPair,
    writer: Arc<Mutex<()>>,
    inner: RwLock<SessionInner>,
}

struct SessionInner {
    transcript: Transcript,
    artifact: ArtifactState,
}

impl SessionInner {
    fn recompute(&mut self, delimiters: &DelimiterPair) {
        self.artifact = self.transcript.extract_artifact(delimiters);
    }
}

impl Session {
    pub fn new(delimiters: DelimiterPair) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            delimiters,
            writer: Arc::new(Mutex::new(())),
            inner: RwLock::new(SessionInner {
                transcript: Transcript::new(),
                artifact: ArtifactState::Unavailable,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn delimiters(&self) -> &DelimiterPair {
        &self.delimiters
    }

    /// Attempts to become the session's single writer. `None` while another
    /// reply is still streaming. The returned guard must be held for the
    /// whole streaming response; dropping it ends the writing phase.
    pub fn try_acquire_writer(&self) -> Option<OwnedMutexGuard<()>> {
        self.writer.clone().try_lock_owned().ok()
    }

    /// Appends a complete message and re-runs extraction.
    pub async fn append_message(&self, role: Role, content: impl Into<String>) -> Uuid {
        let message = Message::new(role, content);
        let id = message.id;
        let mut inner = self.inner.write().await;
        inner.transcript.append(message);
        inner.recompute(&self.delimiters);
        id
    }

    /// Opens an empty assistant message for a streaming reply. Deltas are
    /// appended to it via [`Session::push_assistant_delta`].
    pub async fn begin_assistant_message(&self) -> Uuid {
        self.append_message(Role::Assistant, "").await
    }

    /// Appends one streamed delta to the open assistant message and re-runs
    /// extraction, so the artifact may flip to available mid-reply.
    pub async fn push_assistant_delta(&self, delta: &str) {
        let mut inner = self.inner.write().await;
        let was_available = inner.artifact.is_available();
        inner.transcript.update_last(delta);
        inner.recompute(&self.delimiters);
        if !was_available && inner.artifact.is_available() {
            debug!("Artifact became available for session {}", self.id);
        }
    }

    pub async fn artifact(&self) -> ArtifactState {
        self.inner.read().await.artifact.clone()
    }

    /// Artifact text for export: `None` when unavailable, and also when the
    /// extracted block trimmed down to nothing. An empty document is never
    /// worth rendering.
    pub async fn artifact_for_export(&self) -> Option<String> {
        let inner = self.inner.read().await;
        match inner.artifact.artifact_text() {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => None,
        }
    }

    pub async fn transcript_snapshot(&self) -> Vec<Message> {
        self.inner.read().await.transcript.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UNAVAILABLE_PLACEHOLDER;

    fn session() -> Session {
        Session::new(DelimiterPair::new("[RESUME_START]", "[RESUME_END]").unwrap())
    }

    #[tokio::test]
    async fn test_new_session_has_no_artifact() {
        let session = session();
        assert_eq!(session.artifact().await, ArtifactState::Unavailable);
        assert_eq!(
            session.artifact().await.display_text(),
            UNAVAILABLE_PLACEHOLDER
        );
        assert!(session.transcript_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_recomputes_artifact() {
        let session = session();
        session.append_message(Role::User, "hi").await;
        assert_eq!(session.artifact().await, ArtifactState::Unavailable);

        session
            .append_message(
                Role::Assistant,
                "[RESUME_START]\nJane Doe\n[RESUME_END]",
            )
            .await;
        assert_eq!(
            session.artifact().await,
            ArtifactState::Available("Jane Doe".to_string())
        );
    }

    #[tokio::test]
    async fn test_streamed_deltas_flip_artifact_available() {
        let session = session();
        session.begin_assistant_message().await;

        session.push_assistant_delta("[RESUME_ST").await;
        assert!(!session.artifact().await.is_available());

        session.push_assistant_delta("ART]\nJane Doe\n[RESUME_").await;
        assert!(!session.artifact().await.is_available());

        session.push_assistant_delta("END]").await;
        assert_eq!(
            session.artifact().await,
            ArtifactState::Available("Jane Doe".to_string())
        );
    }

    #[tokio::test]
    async fn test_writer_permit_is_exclusive() {
        let session = session();
        let permit = session.try_acquire_writer();
        assert!(permit.is_some());
        assert!(session.try_acquire_writer().is_none());

        drop(permit);
        assert!(session.try_acquire_writer().is_some());
    }

    #[tokio::test]
    async fn test_empty_artifact_is_available_but_not_exportable() {
        let session = session();
        session
            .append_message(Role::Assistant, "[RESUME_START][RESUME_END]")
            .await;

        assert!(session.artifact().await.is_available());
        assert_eq!(session.artifact_for_export().await, None);
    }

    #[tokio::test]
    async fn test_artifact_for_export_returns_trimmed_block() {
        let session = session();
        session
            .append_message(Role::Assistant, "[RESUME_START]\n  Jane Doe  \n[RESUME_END]")
            .await;

        assert_eq!(
            session.artifact_for_export().await,
            Some("Jane Doe".to_string())
        );
    }
}
