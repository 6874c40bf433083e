//! Trait definitions for upstream backends.

use crate::ChunkStream;
use async_trait::async_trait;
use bluebox_core::GenerateRequest;
use bluebox_error::BlueboxResult;

/// Core trait that all upstream completion backends implement.
pub trait BlueboxDriver: Send + Sync {
    /// Provider name (e.g., "groq").
    fn provider_name(&self) -> &'static str;

    /// Endpoint the driver talks to, for logging.
    fn endpoint(&self) -> &str;
}

/// Trait for backends that stream completions.
#[async_trait]
pub trait Streaming: BlueboxDriver {
    /// Open a streaming completion.
    ///
    /// Errors returned here happen before any fragment was produced. Errors
    /// yielded by the stream happen mid-generation.
    async fn generate_stream(&self, req: &GenerateRequest) -> BlueboxResult<ChunkStream>;
}

/// Source of real-time context for search and news intents.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Web context for a query: a scraped page when `query` is a URL,
    /// otherwise summarized search results.
    async fn web_context(&self, query: &str) -> BlueboxResult<String>;

    /// Current headlines rendered as text.
    async fn news_context(&self) -> BlueboxResult<String>;
}
