/// LLM Client — the single point of entry for all Claude API calls in Vitae.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
mod sse;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Vitae.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Stream error: {0}")]
    Stream(String),
}

/// One conversation turn in Anthropic wire format. Borrowed so a transcript
/// snapshot can be sent without copying message bodies.
#[derive(Debug, Serialize)]
pub struct ChatTurn<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatTurn<'a>],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Decoded upstream events, reduced to what the transcript needs: text
/// deltas and end-of-reply. Protocol bookkeeping frames never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmStreamEvent {
    TextDelta(String),
    Done,
}

pub type LlmStream = Pin<Box<dyn Stream<Item = Result<LlmStreamEvent, LlmError>> + Send>>;

/// The single LLM client used by all services in Vitae.
/// Wraps the Anthropic streaming Messages API with connect-phase retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            // Connect timeout only: the response body streams for as long
            // as the model talks, so an overall request timeout would cut
            // off long replies.
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Opens a streaming chat completion for the given system prompt and
    /// conversation history.
    ///
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff,
    /// but only while connecting. Once the stream is open a failure surfaces
    /// as a stream error instead of a replay, so callers never see the same
    /// delta twice.
    pub async fn stream_chat(
        &self,
        system: &str,
        history: &[ChatTurn<'_>],
    ) -> Result<LlmStream, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: history,
            stream: true,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM connect attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!("LLM stream connected (attempt {})", attempt + 1);

            return Ok(event_stream(response));
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Decodes the response body as server-sent events and reduces each frame
/// through [`sse::parse_event`]. The stream ends at `message_stop`, on the
/// first error, or when the body closes.
fn event_stream(response: reqwest::Response) -> LlmStream {
    Box::pin(async_stream::stream! {
        let mut frames = response.bytes_stream().eventsource();

        while let Some(frame) = frames.next().await {
            match frame {
                Ok(frame) => match sse::parse_event(&frame.event, &frame.data) {
                    Ok(Some(event)) => {
                        let done = matches!(event, LlmStreamEvent::Done);
                        yield Ok(event);
                        if done {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                },
                Err(e) => {
                    yield Err(LlmError::Stream(e.to_string()));
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_anthropic_wire_format() {
        let turns = [
            ChatTurn {
                role: "user",
                content: "hello",
            },
            ChatTurn {
                role: "assistant",
                content: "hi there",
            },
        ];
        let request = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: "be brief",
            messages: &turns,
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-5");
        assert_eq!(json["stream"], true);
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hi there");
    }

    #[test]
    fn test_anthropic_error_body_parses() {
        let body =
            r#"{"type":"error","error":{"type":"invalid_request_error","message":"bad key"}}"#;
        let parsed: AnthropicError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "bad key");
    }
}
