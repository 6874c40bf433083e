//! Headline feed reduction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A news headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    /// Headline text
    pub title: String,
    /// Publisher
    #[serde(default)]
    pub source: String,
    /// Article URL
    #[serde(default)]
    pub link: String,
}

/// Take up to `per_section` headlines from each named section, in section order.
///
/// The feed is an object keyed by section name. Missing sections and malformed
/// items are skipped.
///
/// ```
/// use bluebox_context::parse_headlines;
/// use serde_json::json;
///
/// let feed = json!({"World": [{"title": "A", "source": "S", "link": "L"}]});
/// let headlines = parse_headlines(&feed, &["World".to_string(), "Science".to_string()], 3);
/// assert_eq!(headlines.len(), 1);
/// ```
pub fn parse_headlines(feed: &Value, sections: &[String], per_section: usize) -> Vec<Headline> {
    sections
        .iter()
        .filter_map(|section| feed.get(section)?.as_array())
        .flat_map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<Headline>(item.clone()).ok())
                .take(per_section)
        })
        .collect()
}

/// Render headlines as model context.
pub fn format_headlines(headlines: &[Headline]) -> String {
    let lines = headlines
        .iter()
        .map(|h| {
            if h.source.is_empty() {
                format!("- {}", h.title)
            } else {
                format!("- {} ({})", h.title, h.source)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("Latest headlines:\n{}", lines)
}
