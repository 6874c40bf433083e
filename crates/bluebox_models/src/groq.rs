//! Groq LPU inference driver.

use crate::OpenAICompatibleClient;
use async_trait::async_trait;
use bluebox_core::GenerateRequest;
use bluebox_error::{BlueboxResult, ModelsError, ModelsErrorKind, ModelsResult};
use bluebox_interface::{BlueboxDriver, ChunkStream, Streaming};
use tracing::instrument;

/// Default Groq chat-completions endpoint.
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq driver built on the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct GroqDriver {
    inner: OpenAICompatibleClient,
}

impl GroqDriver {
    /// Creates a Groq driver from the `GROQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is unset or empty.
    #[instrument(skip_all)]
    pub fn from_env(endpoint: Option<String>) -> ModelsResult<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ModelsError::new(ModelsErrorKind::MissingApiKey("GROQ_API_KEY".to_string()))
            })?;
        Self::with_api_key(api_key, endpoint)
    }

    /// Creates a Groq driver with an explicit key and optional endpoint override.
    #[instrument(skip(api_key))]
    pub fn with_api_key(api_key: String, endpoint: Option<String>) -> ModelsResult<Self> {
        let endpoint = endpoint.unwrap_or_else(|| GROQ_ENDPOINT.to_string());
        let inner = OpenAICompatibleClient::new(api_key, endpoint, "groq")?;
        Ok(Self { inner })
    }
}

impl BlueboxDriver for GroqDriver {
    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

#[async_trait]
impl Streaming for GroqDriver {
    async fn generate_stream(&self, req: &GenerateRequest) -> BlueboxResult<ChunkStream> {
        self.inner.generate_stream(req).await
    }
}
