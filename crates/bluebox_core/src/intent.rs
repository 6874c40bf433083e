//! Structured request intent chosen by the client UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bracketed markers older clients prepended to user text.
const LEGACY_TAGS: &[&str] = &["[News]", "[Search]", "[BlueboxThink]"];

/// What the user asked the assistant to do with their message.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// Ordinary chat turn
    #[default]
    #[display("plain")]
    Plain,
    /// Answer using web search results or a scraped page
    #[display("search")]
    Search,
    /// Answer using current news headlines
    #[display("news")]
    News,
}

/// Intent plus the text it applies to.
///
/// # Examples
///
/// ```
/// use bluebox_core::{IntentKind, RequestIntent};
/// use serde_json::json;
///
/// let intent = RequestIntent::from_value(&json!({"kind": "search", "text": "rust 2024"}));
/// assert_eq!(intent.kind, IntentKind::Search);
///
/// let unknown = RequestIntent::from_value(&json!({"kind": "horoscope"}));
/// assert_eq!(unknown.kind, IntentKind::Plain);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestIntent {
    /// Requested mode
    pub kind: IntentKind,
    /// Query text; when absent the latest user text is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RequestIntent {
    /// Plain chat intent.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Leniently decode an intent. Unknown or missing kinds become `Plain`.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::plain();
        };
        let kind = match object.get("kind").and_then(Value::as_str) {
            Some("search") => IntentKind::Search,
            Some("news") => IntentKind::News,
            _ => IntentKind::Plain,
        };
        let text = object
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { kind, text }
    }
}

/// Remove legacy bracket tags from user text.
///
/// ```
/// assert_eq!(bluebox_core::strip_legacy_tags("[News] cricket scores"), "cricket scores");
/// ```
pub fn strip_legacy_tags(text: &str) -> String {
    let mut cleaned = text.to_string();
    for tag in LEGACY_TAGS {
        cleaned = cleaned.replace(tag, "");
    }
    cleaned.trim().to_string()
}
