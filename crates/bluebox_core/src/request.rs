//! Relay input and upstream generation request types.

use crate::{ConversationMessage, ModelTier, RequestIntent, Role, strip_legacy_tags};
use bluebox_error::{RelayError, RelayErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conversation accepted by the relay, after lenient filtering.
///
/// Holds at most one system message (the first one supplied) and only the
/// entries that passed validation, in their original order.
///
/// # Examples
///
/// ```
/// use bluebox_core::{ConversationRequest, ModelTier};
///
/// let body = br#"{"messages":[{"role":"user","content":"hello"},{"role":"tool","content":"x"}],"modelTier":"premium"}"#;
/// let request = ConversationRequest::from_json(body).unwrap();
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.model_tier, ModelTier::Premium);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    /// Retained messages, oldest first
    pub messages: Vec<ConversationMessage>,
    /// Requested model tier
    #[serde(default)]
    pub model_tier: ModelTier,
    /// Structured intent chosen by the client
    #[serde(default)]
    pub intent: RequestIntent,
}

impl ConversationRequest {
    /// Parse and filter a raw request body.
    ///
    /// # Errors
    ///
    /// `MalformedRequestBody` when the body is not a JSON object.
    /// `EmptyConversation` when no message survives filtering.
    #[track_caller]
    pub fn from_json(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::new(RelayErrorKind::MalformedRequestBody(e.to_string())))?;
        Self::from_value(&value)
    }

    /// Filter an already-parsed body.
    #[track_caller]
    pub fn from_value(value: &Value) -> Result<Self, RelayError> {
        let Some(object) = value.as_object() else {
            return Err(RelayError::new(RelayErrorKind::MalformedRequestBody(
                "expected a JSON object".to_string(),
            )));
        };

        let mut seen_system = false;
        let messages: Vec<ConversationMessage> = object
            .get("messages")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(ConversationMessage::from_value)
                    .filter(|message| {
                        if message.role != Role::System {
                            return true;
                        }
                        !std::mem::replace(&mut seen_system, true)
                    })
                    .filter_map(Self::strip_user_tags)
                    .collect()
            })
            .unwrap_or_default();

        if messages.is_empty() {
            return Err(RelayError::new(RelayErrorKind::EmptyConversation));
        }

        let model_tier = ModelTier::from_flag(object.get("modelTier").and_then(Value::as_str));
        let intent = object
            .get("intent")
            .map(RequestIntent::from_value)
            .unwrap_or_default();

        Ok(Self {
            messages,
            model_tier,
            intent,
        })
    }

    /// Remove legacy tags from a user message; other roles pass through as sent.
    ///
    /// A user message left with no text and no image by the stripping is dropped.
    fn strip_user_tags(message: ConversationMessage) -> Option<ConversationMessage> {
        if message.role != Role::User {
            return Some(message);
        }
        let had_text = !message.content.text().trim().is_empty();
        let content = message.content.map_text(strip_legacy_tags);
        if had_text && !content.has_image() && content.text().trim().is_empty() {
            return None;
        }
        Some(ConversationMessage {
            role: message.role,
            content,
        })
    }

    /// The caller-supplied system message, if any.
    pub fn system_message(&self) -> Option<&ConversationMessage> {
        self.messages.iter().find(|m| m.role == Role::System)
    }

    /// Text of the most recent user message.
    pub fn last_user_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.text())
            .filter(|text| !text.trim().is_empty())
    }

    /// Split into the system message and the most recent `window` other messages.
    pub fn windowed(&self, window: usize) -> (Option<ConversationMessage>, Vec<ConversationMessage>) {
        let system = self.system_message().cloned();
        let history: Vec<ConversationMessage> = self
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect();
        let skip = history.len().saturating_sub(window);
        (system, history.into_iter().skip(skip).collect())
    }
}

/// Fully assembled request sent to an upstream driver.
///
/// ```
/// use bluebox_core::{ConversationMessage, GenerateRequest};
///
/// let request = GenerateRequest::builder()
///     .model("llama-3.1-8b-instant")
///     .messages(vec![ConversationMessage::user("hi")])
///     .build()
///     .unwrap();
/// assert_eq!(*request.max_tokens(), 512);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder, Getters)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// Upstream model identifier
    model: String,
    /// Messages in the order they are sent upstream
    messages: Vec<ConversationMessage>,
    /// Output length cap
    #[builder(default = "512")]
    max_tokens: u32,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
}

impl GenerateRequest {
    /// Creates a new builder for `GenerateRequest`.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}
