use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SERIALIZE_FALLBACK: &str =
    r#"{"type":"error","message":"Failed to serialize stream event"}"#;

/// Events emitted to the client over the message-streaming response.
///
/// `Done` closes every stream, including failed ones: `Error` describes what
/// went wrong, `Done` still reports the assistant message id and whether an
/// artifact is currently available, so clients always regain a consistent
/// view without refetching the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// Incremental text chunk of the assistant reply.
    Delta { text: String },

    /// The reply ended, normally or not.
    Done {
        message_id: Uuid,
        artifact_available: bool,
    },

    /// The upstream stream failed; the transcript keeps whatever text
    /// arrived before the failure.
    Error { message: String },
}

impl ChatStreamEvent {
    /// Encodes the event as the data payload of one SSE frame.
    pub fn to_sse(&self) -> axum::response::sse::Event {
        let data =
            serde_json::to_string(self).unwrap_or_else(|_| SERIALIZE_FALLBACK.to_string());
        axum::response::sse::Event::default().data(data)
    }
}
