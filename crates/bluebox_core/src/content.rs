//! Message content: plain text or an ordered sequence of typed parts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to an image attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Image location (https URL or `data:` URI)
    pub url: String,
    /// Optional resolution hint forwarded to vision models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A single typed piece of multimodal content.
///
/// Serializes in the chat-completions wire shape:
///
/// ```
/// use bluebox_core::ContentPart;
///
/// let part = ContentPart::text("hi");
/// assert_eq!(
///     serde_json::to_value(&part).unwrap(),
///     serde_json::json!({"type": "text", "text": "hi"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text fragment
    Text {
        /// The text
        text: String,
    },
    /// Image reference
    ImageUrl {
        /// Where the image lives
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Image part with no detail hint.
    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    /// Whether this part references an image.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageUrl { .. })
    }

    /// Leniently decode a part from untrusted JSON.
    ///
    /// Accepts `image_url` either as `{ "url": ... }` or as a bare string.
    /// Unknown `type` values and missing fields yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        match object.get("type")?.as_str()? {
            "text" => {
                let text = object.get("text")?.as_str()?;
                Some(ContentPart::text(text))
            }
            "image_url" => match object.get("image_url")? {
                Value::String(url) => Some(ContentPart::image(url.clone())),
                Value::Object(image) => {
                    let url = image.get("url")?.as_str()?.to_string();
                    let detail = image
                        .get("detail")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    Some(ContentPart::ImageUrl {
                        image_url: ImageUrl { url, detail },
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Body of a conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Ordered, non-empty sequence of typed parts
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Leniently decode content from untrusted JSON.
    ///
    /// Strings are taken as-is. Arrays keep only parts that decode; an array
    /// with no decodable part yields `None`, as does any other JSON type.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(MessageContent::Text(text.clone())),
            Value::Array(items) => {
                let parts: Vec<ContentPart> =
                    items.iter().filter_map(ContentPart::from_value).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(MessageContent::Parts(parts))
                }
            }
            _ => None,
        }
    }

    /// Whether any part references an image.
    pub fn has_image(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts.iter().any(ContentPart::is_image),
        }
    }

    /// Concatenated text, with parts joined by newlines.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Apply `f` to every text segment, leaving images untouched.
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            MessageContent::Text(text) => MessageContent::Text(f(&text)),
            MessageContent::Parts(parts) => MessageContent::Parts(
                parts
                    .into_iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => ContentPart::Text { text: f(&text) },
                        image => image,
                    })
                    .collect(),
            ),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}
