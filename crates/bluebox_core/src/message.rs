//! Message types for conversation history.

use crate::{MessageContent, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single turn of a conversation.
///
/// # Examples
///
/// ```
/// use bluebox_core::{ConversationMessage, Role};
///
/// let message = ConversationMessage::user("Hello!");
/// assert_eq!(message.role, Role::User);
/// assert!(!message.has_image());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Author of the message
    pub role: Role,
    /// The content (text or typed parts)
    pub content: MessageContent,
}

impl ConversationMessage {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Whether the content carries an image reference.
    pub fn has_image(&self) -> bool {
        self.content.has_image()
    }

    /// Leniently decode one history entry.
    ///
    /// Returns `None` for anything that is not an object with a recognized
    /// string `role` and a string or array `content`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let role = Role::from_name(object.get("role")?.as_str()?)?;
        let content = MessageContent::from_value(object.get("content")?)?;
        Some(Self { role, content })
    }
}
