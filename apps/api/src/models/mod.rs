// Domain models shared across modules.
// Implements: chat message representation used by transcripts, handlers and
// the LLM client boundary.

pub mod message;
