//! Axum route handler for the streaming message endpoint.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::events::ChatStreamEvent;
use crate::errors::AppError;
use crate::llm_client::prompts::interview_system_prompt;
use crate::llm_client::{ChatTurn, LlmStream, LlmStreamEvent};
use crate::models::message::{Message, Role};
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/v1/sessions/:id/messages
///
/// Appends the user message, relays the model's reply as SSE frames, and
/// folds every delta into the transcript as it arrives. One reply may
/// stream per session at a time; concurrent sends get 409.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    // Claim the writer before touching the transcript so a racing send
    // cannot interleave its user message into someone else's reply.
    let writer_permit = session.try_acquire_writer().ok_or(AppError::SessionBusy)?;

    session.append_message(Role::User, request.content).await;

    let system = interview_system_prompt(session.delimiters());
    let snapshot = session.transcript_snapshot().await;
    let turns = chat_turns(&snapshot);

    let upstream = state
        .llm
        .stream_chat(&system, &turns)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    // Opened only after the upstream connection succeeds, so a failed
    // connect never leaves an empty assistant message behind.
    let message_id = session.begin_assistant_message().await;

    let stream = assistant_event_stream(session, message_id, upstream, writer_permit)
        .map(|event| Ok::<_, Infallible>(event.to_sse()));

    Ok(Sse::new(stream).keep_alive(KeepAlive::new()))
}

/// Projects a transcript snapshot into Anthropic wire turns. System-role
/// entries are excluded (the system prompt travels in its own request
/// field), and so are empty-content entries: a reply that failed before
/// its first delta leaves an empty assistant message in the append-only
/// transcript, and the Messages API rejects empty content.
fn chat_turns(messages: &[Message]) -> Vec<ChatTurn<'_>> {
    messages
        .iter()
        .filter(|m| m.role != Role::System && !m.content.is_empty())
        .map(|m| ChatTurn {
            role: m.role.as_str(),
            content: m.content.as_str(),
        })
        .collect()
}

/// Drives the upstream reply to completion, mirroring each text delta into
/// the session before forwarding it to the client.
///
/// The writer permit lives inside the stream: however the response ends
/// (message_stop, upstream error, client disconnect), dropping the stream
/// releases the session for the next message. On upstream failure the
/// transcript keeps the partial reply and extraction keeps whatever state
/// the text so far produces.
fn assistant_event_stream(
    session: Arc<Session>,
    message_id: Uuid,
    mut upstream: LlmStream,
    writer_permit: OwnedMutexGuard<()>,
) -> impl Stream<Item = ChatStreamEvent> {
    async_stream::stream! {
        let _writer_permit = writer_permit;

        loop {
            match upstream.next().await {
                Some(Ok(LlmStreamEvent::TextDelta(text))) => {
                    session.push_assistant_delta(&text).await;
                    yield ChatStreamEvent::Delta { text };
                }
                Some(Ok(LlmStreamEvent::Done)) | None => {
                    let artifact_available = session.artifact().await.is_available();
                    info!(
                        "Assistant reply {} complete (artifact_available: {})",
                        message_id, artifact_available
                    );
                    yield ChatStreamEvent::Done {
                        message_id,
                        artifact_available,
                    };
                    break;
                }
                Some(Err(e)) => {
                    warn!("LLM stream failed mid-reply: {e}");
                    yield ChatStreamEvent::Error {
                        message: "model stream interrupted".to_string(),
                    };
                    let artifact_available = session.artifact().await.is_available();
                    yield ChatStreamEvent::Done {
                        message_id,
                        artifact_available,
                    };
                    break;
                }
            }
        }
    }
}
