//! OpenAI-compatible chat-completions client.

mod client;
mod dto;
mod sse;

pub use client::{OpenAICompatibleClient, chunk_from_event};
pub use dto::{ApiErrorBody, ChatCompletionChunk, ChatCompletionRequest, ChunkChoice, ChunkDelta};
pub use sse::{SseEvent, SseLineBuffer};
