//! Wire types for the chat-completions API.

use bluebox_core::{ConversationMessage, GenerateRequest};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatCompletionRequest {
    /// Model identifier
    model: String,
    /// Conversation in wire shape
    messages: Vec<ConversationMessage>,
    /// Output length cap
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
    /// Whether to stream server-sent events
    #[builder(default = "true")]
    stream: bool,
}

impl ChatCompletionRequest {
    /// Creates a new builder for `ChatCompletionRequest`.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }

    /// Streaming request for a generation request.
    pub fn streaming(req: &GenerateRequest) -> Self {
        Self {
            model: req.model().clone(),
            messages: req.messages().clone(),
            max_tokens: *req.max_tokens(),
            temperature: *req.temperature(),
            stream: true,
        }
    }
}

/// One streamed `chat.completion.chunk` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Choices; the relay only requests one
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Error reported in-band by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// A choice within a streamed chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Incremental content
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Present on the last chunk of a choice
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Text fragment
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object returned by OpenAI-compatible providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message
    pub message: String,
    /// Provider error type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Envelope around [`ApiErrorBody`] in non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub(crate) error: ApiErrorBody,
}
