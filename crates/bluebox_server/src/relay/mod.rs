//! Completion relay: validate, gather context, select, forward, stream back.

mod pacing;
mod persona;
mod select;
mod stream;

pub use pacing::{NoPacing, PaceWindow, Pacing, PacingConfig, TierPacing};
pub use persona::{persona_prompt, with_realtime_context};
pub use select::{ModelSelection, ModelTable};
pub use stream::{RelayStream, relay_fragments};

use crate::RelayConfig;
use bluebox_core::{ConversationMessage, ConversationRequest, GenerateRequest, IntentKind};
use bluebox_error::{BlueboxError, BlueboxErrorKind, ModelsErrorKind, RelayError, RelayErrorKind};
use bluebox_interface::{ContextProvider, Streaming};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Relays one conversation to the upstream model and streams the answer back.
///
/// # Examples
///
/// ```
/// use bluebox_server::{CompletionRelay, NoPacing, RelayConfig};
/// use std::sync::Arc;
///
/// let relay = CompletionRelay::builder()
///     .config(RelayConfig::default())
///     .pacing(Arc::new(NoPacing))
///     .build()
///     .unwrap();
/// assert!(!relay.has_driver());
/// ```
#[derive(Clone, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct CompletionRelay {
    /// Relay settings
    config: RelayConfig,
    /// Upstream backend; absent when no credential is configured
    #[builder(default, setter(strip_option))]
    driver: Option<Arc<dyn Streaming>>,
    /// Real-time context source for search and news intents
    #[builder(default, setter(strip_option))]
    context: Option<Arc<dyn ContextProvider>>,
    /// Output pacing strategy
    #[builder(default = "Arc::new(NoPacing) as Arc<dyn Pacing>")]
    pacing: Arc<dyn Pacing>,
}

impl fmt::Debug for CompletionRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRelay")
            .field("config", &self.config)
            .field("driver", &self.driver.as_ref().map(|d| d.provider_name()))
            .field("context", &self.context.is_some())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl CompletionRelay {
    /// Creates a new builder for `CompletionRelay`.
    pub fn builder() -> CompletionRelayBuilder {
        CompletionRelayBuilder::default()
    }

    /// Whether an upstream backend is configured.
    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    /// Relay settings.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Validate `body`, open the upstream stream and return the response body.
    ///
    /// # Errors
    ///
    /// - `MalformedRequestBody` / `EmptyConversation` before any upstream call
    /// - `ConfigurationMissing` when no backend credential is configured
    /// - `UpstreamFailure` when the upstream rejects the request before streaming
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn relay(&self, body: &[u8]) -> Result<RelayStream, RelayError> {
        let request = ConversationRequest::from_json(body)?;

        let Some(driver) = self.driver.as_ref() else {
            warn!("Chat request received but no upstream credential is configured");
            return Err(RelayError::new(RelayErrorKind::ConfigurationMissing(
                "GROQ_API_KEY is not set".to_string(),
            )));
        };

        let context = self.gather_context(&request).await;
        let today = chrono::Local::now().date_naive();
        let generate = self.prepare(&request, context.as_deref(), today)?;

        info!(
            model = %generate.model(),
            tier = %request.model_tier,
            intent = %request.intent.kind,
            messages = generate.messages().len(),
            "Relaying conversation"
        );

        let upstream = driver
            .generate_stream(&generate)
            .await
            .map_err(upstream_error)?;

        Ok(relay_fragments(
            upstream,
            Arc::clone(&self.pacing),
            request.model_tier,
        ))
    }

    /// Assemble the upstream request: window, persona, context, model.
    pub fn prepare(
        &self,
        request: &ConversationRequest,
        context: Option<&str>,
        today: NaiveDate,
    ) -> Result<GenerateRequest, RelayError> {
        let (system, history) = request.windowed(self.config.history_window);

        let has_image = system.as_ref().is_some_and(ConversationMessage::has_image)
            || history.iter().any(ConversationMessage::has_image);
        let selection = ModelSelection::choose(has_image, request.model_tier);
        let model = self.config.models.model_for(selection);
        debug!(%selection, model, "Selected upstream model");

        let system = system.unwrap_or_else(|| {
            ConversationMessage::system(persona_prompt(&self.config.assistant_name, today))
        });
        let system = match context {
            Some(context) => with_realtime_context(system, context),
            None => system,
        };

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(system);
        messages.extend(history);

        GenerateRequest::builder()
            .model(model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()
            .map_err(|e| RelayError::new(RelayErrorKind::UpstreamFailure(e.to_string())))
    }

    /// Fetch context for search and news intents. Failures degrade to none.
    async fn gather_context(&self, request: &ConversationRequest) -> Option<String> {
        let kind = request.intent.kind;
        if kind == IntentKind::Plain {
            return None;
        }
        let Some(provider) = self.context.as_ref() else {
            debug!(%kind, "No context provider configured, answering without context");
            return None;
        };

        let result = match kind {
            IntentKind::Search => {
                let query = request
                    .intent
                    .text
                    .clone()
                    .or_else(|| request.last_user_text())?;
                provider.web_context(&query).await
            }
            IntentKind::News => provider.news_context().await,
            IntentKind::Plain => return None,
        };

        match result {
            Ok(context) if !context.trim().is_empty() => Some(context),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, %kind, "Context lookup failed, answering without context");
                None
            }
        }
    }
}

/// Translate a pre-stream backend error into a relay failure.
fn upstream_error(err: BlueboxError) -> RelayError {
    match err.kind() {
        BlueboxErrorKind::Models(models) => match &models.kind {
            ModelsErrorKind::MissingApiKey(detail) => {
                RelayError::new(RelayErrorKind::ConfigurationMissing(detail.clone()))
            }
            other => RelayError::new(RelayErrorKind::UpstreamFailure(other.to_string())),
        },
        BlueboxErrorKind::Relay(relay) => relay.clone(),
        other => RelayError::new(RelayErrorKind::UpstreamFailure(other.to_string())),
    }
}
