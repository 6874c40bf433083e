//! HTML reduction for scraped pages and search result pages.

use bluebox_error::{ContextError, ContextErrorKind};
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const RESULT_MARKER: &str = "class=\"result__body\"";

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result snippet
    pub snippet: String,
}

/// Whether `query` is a single http(s) URL to scrape rather than search terms.
///
/// ```
/// use bluebox_context::is_url;
///
/// assert!(is_url("https://example.com/page?id=1"));
/// assert!(!is_url("what is https"));
/// assert!(!is_url("https://example.com and more"));
/// ```
pub fn is_url(query: &str) -> bool {
    let query = query.trim();
    (query.starts_with("http://") || query.starts_with("https://"))
        && !query.chars().any(char::is_whitespace)
        && query.len() > "https://".len()
}

/// Whether `url` names a host on the public internet.
///
/// Loopback, private, link-local and unspecified addresses are refused, as is
/// `localhost` and anything under it. Hostnames are not resolved.
///
/// ```
/// use bluebox_context::is_public_url;
///
/// assert!(is_public_url("https://example.com/page"));
/// assert!(!is_public_url("http://127.0.0.1:8080/admin"));
/// assert!(!is_public_url("http://169.254.169.254/latest/meta-data"));
/// assert!(!is_public_url("http://[::1]/"));
/// assert!(!is_public_url("http://printer.localhost/"));
/// ```
pub fn is_public_url(url: &str) -> bool {
    let Ok(url) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let lowered = host.to_ascii_lowercase();
    if lowered == "localhost" || lowered.ends_with(".localhost") {
        return false;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => is_public_v4(ip),
        Ok(IpAddr::V6(ip)) => is_public_v6(ip),
        Err(_) => true,
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.octets()[0] == 0)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_v4(v4);
    }
    let first = ip.segments()[0];
    // fc00::/7 unique local, fe80::/10 link local
    !(ip.is_loopback()
        || ip.is_unspecified()
        || first & 0xfe00 == 0xfc00
        || first & 0xffc0 == 0xfe80)
}

/// Compiled patterns for turning HTML into plain text.
#[derive(Debug, Clone)]
pub struct Extractor {
    script: Regex,
    style: Regex,
    tag: Regex,
    whitespace: Regex,
    title: Regex,
    snippet: Regex,
}

impl Extractor {
    /// Compile the extraction patterns.
    #[track_caller]
    pub fn new() -> Result<Self, ContextError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| ContextError::new(ContextErrorKind::Parse(e.to_string())))
        };
        Ok(Self {
            script: compile(r"(?is)<script\b[^>]*>.*?</script>")?,
            style: compile(r"(?is)<style\b[^>]*>.*?</style>")?,
            tag: compile(r"<[^>]+>")?,
            whitespace: compile(r"\s+")?,
            title: compile(r#"(?s)class="result__a"[^>]*>(.*?)</a>"#)?,
            snippet: compile(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#)?,
        })
    }

    /// Visible text of a page, whitespace-collapsed and cut to `limit` characters.
    pub fn page_text(&self, html: &str, limit: usize) -> String {
        let text = self.script.replace_all(html, "");
        let text = self.style.replace_all(&text, "");
        let text = self.tag.replace_all(&text, " ");
        let text = decode_entities(&text);
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().chars().take(limit).collect()
    }

    /// Title/snippet pairs from a search results page, in page order.
    ///
    /// Blocks missing either part are skipped.
    pub fn search_results(&self, html: &str, max: usize) -> Vec<SearchResult> {
        html.split(RESULT_MARKER)
            .skip(1)
            .take(max)
            .filter_map(|block| {
                let title = self.title.captures(block)?.get(1)?.as_str();
                let snippet = self.snippet.captures(block)?.get(1)?.as_str();
                Some(SearchResult {
                    title: self.inline_text(title),
                    snippet: self.inline_text(snippet),
                })
            })
            .collect()
    }

    fn inline_text(&self, fragment: &str) -> String {
        let text = self.tag.replace_all(fragment, "");
        let text = decode_entities(&text);
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

/// Render search hits as model context.
pub fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "I searched the web but couldn't find a direct answer. Please try a different query or use the Live News feature.".to_string();
    }
    let body = results
        .iter()
        .map(|r| format!("- {}\n  {}", r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Top web results for \"{}\":\n\n{}", query, body)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
