//! HTTP-backed context provider.

use crate::{
    ContextConfig, Extractor, Headline, format_headlines, format_search_results, is_public_url,
    is_url, parse_headlines,
};
use async_trait::async_trait;
use bluebox_error::{BlueboxResult, ContextError, ContextErrorKind};
use bluebox_interface::ContextProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Result of a web lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebContext {
    /// Text of a fetched page
    Scrape {
        /// Page text
        content: String,
        /// The page fetched
        url: String,
    },
    /// Summarized search results
    Search {
        /// Rendered results
        content: String,
        /// The query searched
        query: String,
    },
}

impl WebContext {
    /// The text handed to the model.
    pub fn content(&self) -> &str {
        match self {
            WebContext::Scrape { content, .. } | WebContext::Search { content, .. } => content,
        }
    }
}

/// Fetches pages, search results and headlines over HTTP.
#[derive(Debug, Clone)]
pub struct WebContextProvider {
    client: Client,
    extractor: Extractor,
    config: ContextConfig,
}

impl WebContextProvider {
    /// Build a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the extraction patterns cannot be
    /// initialized.
    pub fn new(config: ContextConfig) -> BlueboxResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| ContextError::new(ContextErrorKind::Fetch(e.to_string())))?;
        Ok(Self {
            client,
            extractor: Extractor::new()?,
            config,
        })
    }

    async fn fetch(&self, url: &str) -> Result<reqwest::Response, ContextError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContextError::new(ContextErrorKind::Fetch(e.to_string())))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContextError::new(ContextErrorKind::Fetch(format!(
                "{} returned {}",
                url, status
            ))));
        }
        Ok(response)
    }

    /// Read at most `max_body_bytes` of the body; the remainder is dropped.
    async fn fetch_text(&self, url: &str) -> Result<String, ContextError> {
        let mut response = self.fetch(url).await?;
        let limit = *self.config.max_body_bytes();
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ContextError::new(ContextErrorKind::Fetch(e.to_string())))?
        {
            let room = limit - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(limit, "Response body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetch a page and reduce it to text.
    ///
    /// # Errors
    ///
    /// `BlockedHost` when the URL is not public and private hosts are not allowed.
    #[instrument(skip(self))]
    pub async fn scrape(&self, url: &str) -> BlueboxResult<WebContext> {
        if !*self.config.allow_private_hosts() && !is_public_url(url) {
            warn!("Refusing to scrape non-public host");
            return Err(ContextError::new(ContextErrorKind::BlockedHost(url.to_string())).into());
        }
        info!("Scraping page");
        let html = self.fetch_text(url).await?;
        let content = self.extractor.page_text(&html, *self.config.scrape_limit());
        debug!(chars = content.len(), "Scraped page");
        Ok(WebContext::Scrape {
            content,
            url: url.to_string(),
        })
    }

    /// Search the web and summarize the top results.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> BlueboxResult<WebContext> {
        info!("Searching the web");
        let url = format!(
            "{}?q={}",
            self.config.search_url(),
            urlencoding::encode(query)
        );
        let html = self.fetch_text(&url).await?;
        let results = self
            .extractor
            .search_results(&html, *self.config.search_results());
        debug!(results = results.len(), "Parsed search results");
        Ok(WebContext::Search {
            content: format_search_results(query, &results),
            query: query.to_string(),
        })
    }

    /// Scrape when `query` is a URL, search otherwise.
    ///
    /// # Errors
    ///
    /// `MissingQuery` for a blank query; `BlockedHost` for a non-public URL;
    /// `Fetch` when the upstream page fails.
    pub async fn lookup(&self, query: &str) -> BlueboxResult<WebContext> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ContextError::new(ContextErrorKind::MissingQuery).into());
        }
        if is_url(query) {
            self.scrape(query).await
        } else {
            self.search(query).await
        }
    }

    /// Current headlines from the configured sections.
    #[instrument(skip(self))]
    pub async fn headlines(&self) -> BlueboxResult<Vec<Headline>> {
        let body = self.fetch_text(self.config.news_url()).await?;
        let feed: Value = serde_json::from_str(&body)
            .map_err(|e| ContextError::new(ContextErrorKind::Parse(e.to_string())))?;
        let headlines = parse_headlines(
            &feed,
            self.config.sections(),
            *self.config.headlines_per_section(),
        );
        debug!(headlines = headlines.len(), "Parsed headline feed");
        Ok(headlines)
    }
}

#[async_trait]
impl ContextProvider for WebContextProvider {
    async fn web_context(&self, query: &str) -> BlueboxResult<String> {
        Ok(self.lookup(query).await?.content().to_string())
    }

    async fn news_context(&self) -> BlueboxResult<String> {
        let headlines = self.headlines().await?;
        if headlines.is_empty() {
            return Err(
                ContextError::new(ContextErrorKind::Parse("feed had no headlines".to_string()))
                    .into(),
            );
        }
        Ok(format_headlines(&headlines))
    }
}
