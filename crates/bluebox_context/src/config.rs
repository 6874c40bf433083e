//! Context source settings (`[context]` in `bluebox.toml`).

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Where context comes from and how much of it is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ContextConfig {
    /// HTML search endpoint; the query is appended as `?q=`
    #[serde(default = "default_search_url")]
    search_url: String,
    /// Headline feed returning sections of `{title, source, link}`
    #[serde(default = "default_news_url")]
    news_url: String,
    /// Characters of scraped page text kept
    #[serde(default = "default_scrape_limit")]
    scrape_limit: usize,
    /// Search results kept
    #[serde(default = "default_search_results")]
    search_results: usize,
    /// Headlines kept per section
    #[serde(default = "default_headlines_per_section")]
    headlines_per_section: usize,
    /// Feed sections, in output order
    #[serde(default = "default_sections")]
    sections: Vec<String>,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Bytes of any response body read before the rest is discarded
    #[serde(default = "default_max_body_bytes")]
    max_body_bytes: usize,
    /// Permit scraping loopback, private and link-local addresses
    #[serde(default)]
    allow_private_hosts: bool,
}

impl ContextConfig {
    /// Copy with both endpoints replaced, for pointing at a local server.
    pub fn with_endpoints(mut self, search_url: impl Into<String>, news_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self.news_url = news_url.into();
        self
    }

    /// Copy with a different response body cap.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Copy that may or may not scrape non-public hosts.
    pub fn with_private_hosts(mut self, allow: bool) -> Self {
        self.allow_private_hosts = allow;
        self
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            news_url: default_news_url(),
            scrape_limit: default_scrape_limit(),
            search_results: default_search_results(),
            headlines_per_section: default_headlines_per_section(),
            sections: default_sections(),
            timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            allow_private_hosts: false,
        }
    }
}

fn default_search_url() -> String {
    "https://duckduckgo.com/html/".to_string()
}

fn default_news_url() -> String {
    "https://ok.surf/api/v1/cors/news-feed".to_string()
}

fn default_scrape_limit() -> usize {
    5000
}

fn default_search_results() -> usize {
    5
}

fn default_headlines_per_section() -> usize {
    3
}

fn default_sections() -> Vec<String> {
    ["World", "Technology", "Business", "Science"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_body_bytes() -> usize {
    2_000_000
}
