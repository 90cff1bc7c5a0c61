//! Frame-level decoding of the Anthropic streaming Messages API.
//!
//! Each server-sent event is reduced to at most one [`LlmStreamEvent`].
//! Only `content_block_delta`/`text_delta` and `message_stop` carry
//! information the transcript needs; bookkeeping frames (`ping`,
//! `message_start`, block boundaries, usage deltas) and delta types other
//! than text map to `None`. Unknown event types are skipped rather than
//! rejected so a protocol addition upstream does not break running
//! conversations.

use serde::Deserialize;
use tracing::debug;

use crate::llm_client::{LlmError, LlmStreamEvent};

#[derive(Debug, Deserialize)]
struct SseContentBlockDelta {
    delta: SseDelta,
}

#[derive(Debug, Deserialize)]
struct SseDelta {
    #[serde(rename = "type")]
    delta_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SseErrorEnvelope {
    error: SseErrorBody,
}

#[derive(Debug, Deserialize)]
struct SseErrorBody {
    message: String,
}

/// Decodes one SSE frame. `Ok(None)` means the frame carried nothing the
/// caller needs; `Err` means the stream cannot be trusted past this point.
pub(super) fn parse_event(
    event_type: &str,
    data: &str,
) -> Result<Option<LlmStreamEvent>, LlmError> {
    match event_type {
        "content_block_delta" => {
            let parsed: SseContentBlockDelta = serde_json::from_str(data)?;
            match parsed.delta.delta_type.as_str() {
                "text_delta" => Ok(Some(LlmStreamEvent::TextDelta(
                    parsed.delta.text.unwrap_or_default(),
                ))),
                // thinking_delta, input_json_delta, signature_delta: not
                // part of the visible reply.
                _ => Ok(None),
            }
        }
        "message_stop" => Ok(Some(LlmStreamEvent::Done)),
        "error" => {
            let message = serde_json::from_str::<SseErrorEnvelope>(data)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| data.to_string());
            Err(LlmError::Stream(message))
        }
        "ping" | "message_start" | "content_block_start" | "content_block_stop"
        | "message_delta" => Ok(None),
        other => {
            debug!("Ignoring unknown SSE event type: {other}");
            Ok(None)
        }
    }
}
