//! Streaming client for OpenAI-compatible endpoints.

use super::dto::{ApiErrorResponse, ChatCompletionChunk, ChatCompletionRequest};
use super::sse::{SseEvent, SseLineBuffer};
use async_trait::async_trait;
use bluebox_core::GenerateRequest;
use bluebox_error::{BlueboxError, BlueboxResult, ModelsError, ModelsErrorKind};
use bluebox_interface::{BlueboxDriver, ChunkStream, FinishReason, StreamChunk, Streaming};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, instrument, trace};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for any provider exposing `POST /chat/completions` with SSE streaming.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    endpoint: String,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    /// Create a client for `endpoint` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip(api_key), fields(endpoint = %endpoint))]
    pub fn new(
        api_key: String,
        endpoint: String,
        provider: &'static str,
    ) -> Result<Self, ModelsError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::Http(e.to_string())))?;
        Ok(Self {
            client,
            api_key,
            endpoint,
            provider,
        })
    }

    async fn open(&self, body: &ChatCompletionRequest) -> Result<reqwest::Response, ModelsError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelsError::new(ModelsErrorKind::Http(format!("Request failed: {}", e))))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ModelsError::new(ModelsErrorKind::RateLimit));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        Err(ModelsError::new(ModelsErrorKind::Api {
            status: status.as_u16(),
            message,
        }))
    }
}

/// Turn one SSE event into a stream item.
///
/// Returns `None` for events that carry no text and do not end the stream.
pub fn chunk_from_event(event: SseEvent) -> Option<BlueboxResult<StreamChunk>> {
    let json = match event {
        SseEvent::Done => return Some(Ok(StreamChunk::finished(FinishReason::Stop))),
        SseEvent::Data(json) => json,
    };

    let chunk: ChatCompletionChunk = match serde_json::from_str(&json) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(
                ModelsError::new(ModelsErrorKind::Deserialization(e.to_string())).into(),
            ));
        }
    };

    if let Some(error) = chunk.error {
        return Some(Err(ModelsError::new(ModelsErrorKind::Stream(error.message)).into()));
    }

    let choice = chunk.choices.into_iter().next()?;
    let content = choice.delta.content.unwrap_or_default();
    let finish_reason = choice.finish_reason.as_deref().map(FinishReason::from_wire);
    if content.is_empty() && finish_reason.is_none() {
        return None;
    }
    Some(Ok(StreamChunk {
        content,
        is_final: finish_reason.is_some(),
        finish_reason,
    }))
}

impl BlueboxDriver for OpenAICompatibleClient {
    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Streaming for OpenAICompatibleClient {
    #[instrument(skip(self, req), fields(provider = self.provider, model = %req.model()))]
    async fn generate_stream(&self, req: &GenerateRequest) -> BlueboxResult<ChunkStream> {
        let body = ChatCompletionRequest::streaming(req);
        debug!(messages = body.messages().len(), "Opening streaming completion");
        let response = self.open(&body).await?;
        let mut bytes = Box::pin(response.bytes_stream());

        let stream = async_stream::stream! {
            let mut buffer = SseLineBuffer::new();
            'read: loop {
                let events = match bytes.next().await {
                    Some(Ok(chunk)) => buffer.feed(&chunk),
                    Some(Err(e)) => {
                        error!(error = %e, "Upstream stream read failed");
                        let err: BlueboxError =
                            ModelsError::new(ModelsErrorKind::Stream(e.to_string())).into();
                        yield Err(err);
                        break 'read;
                    }
                    None => {
                        let rest = buffer.flush();
                        for event in rest {
                            if let Some(item) = chunk_from_event(event) {
                                yield item;
                            }
                        }
                        break 'read;
                    }
                };

                for event in events {
                    let done = event == SseEvent::Done;
                    if let Some(item) = chunk_from_event(event) {
                        trace!(ok = item.is_ok(), "Upstream event");
                        yield item;
                    }
                    if done {
                        break 'read;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
