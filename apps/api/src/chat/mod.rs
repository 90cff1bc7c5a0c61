// Streaming chat: accepts a user message, relays the model's reply as
// server-sent events, and feeds every delta through the session transcript
// so extraction stays current while the reply is still in flight.
// All upstream traffic goes through llm_client — no Anthropic calls here.

pub mod events;
pub mod handlers;
