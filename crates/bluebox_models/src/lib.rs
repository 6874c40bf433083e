//! Upstream LLM provider integrations for Bluebox.
//!
//! The relay talks to any OpenAI-compatible chat-completions endpoint through
//! [`OpenAICompatibleClient`]. [`GroqDriver`] binds that client to Groq, the
//! default upstream.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod groq;
mod openai_compat;

pub use groq::{GROQ_ENDPOINT, GroqDriver};
pub use openai_compat::{
    ApiErrorBody, ChatCompletionChunk, ChatCompletionRequest, ChunkChoice, ChunkDelta,
    OpenAICompatibleClient, SseEvent, SseLineBuffer, chunk_from_event,
};
