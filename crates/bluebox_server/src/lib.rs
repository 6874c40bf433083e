//! HTTP service for the Bluebox chat relay.
//!
//! `POST /api/chat` validates a conversation, trims it to the history window,
//! attaches the persona and any real-time context, picks a model by tier and
//! image content, and streams the model's reply back as plain UTF-8 text.
//! Usage, payment webhook and context routes sit alongside it.
//!
//! # Example
//!
//! ```no_run
//! use bluebox_server::{BlueboxConfig, Secrets, build_state, router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BlueboxConfig::load(None)?;
//! let state = build_state(&config, &Secrets::from_env(), false)?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod observability;
mod relay;
mod routes;
mod state;
mod webhook;

pub use config::{BlueboxConfig, RelayConfig, Secrets, ServerSettings};
pub use error::ApiError;
pub use observability::{ObservabilityConfig, init_observability};
pub use relay::{
    CompletionRelay, CompletionRelayBuilder, CompletionRelayBuilderError, ModelSelection,
    ModelTable, NoPacing, PaceWindow, Pacing, PacingConfig, RelayStream, TierPacing,
    persona_prompt, relay_fragments, with_realtime_context,
};
pub use routes::{NewsResponse, UsageStatus, router};
pub use state::AppState;
pub use webhook::{PaymentEntity, PaymentNotes, SIGNATURE_HEADER, SignatureVerifier, WebhookEvent};

use bluebox_context::WebContextProvider;
use bluebox_error::{BlueboxResult, ConfigError};
use bluebox_interface::Streaming;
use bluebox_models::GroqDriver;
use bluebox_store::InMemoryUsageStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Wire configuration and secrets into handler state.
///
/// A missing `GROQ_API_KEY` is not fatal: the service starts and chat
/// requests fail with a configuration error.
pub fn build_state(config: &BlueboxConfig, secrets: &Secrets, no_pacing: bool) -> BlueboxResult<AppState> {
    let upstream_url = secrets
        .upstream_url()
        .clone()
        .unwrap_or_else(|| config.relay.upstream_url.clone());

    let driver: Option<Arc<dyn Streaming>> = match secrets.groq_api_key() {
        Some(key) => Some(
            Arc::new(GroqDriver::with_api_key(key.clone(), Some(upstream_url))?) as Arc<dyn Streaming>,
        ),
        None => {
            warn!("GROQ_API_KEY is not set; chat requests will fail until it is configured");
            None
        }
    };

    let web = Arc::new(WebContextProvider::new(config.context.clone())?);
    let pacing = if no_pacing {
        Arc::new(NoPacing) as Arc<dyn Pacing>
    } else {
        config.pacing.strategy()
    };

    let mut relay = CompletionRelay::builder()
        .config(config.relay.clone())
        .context(Arc::clone(&web) as Arc<dyn bluebox_interface::ContextProvider>)
        .pacing(pacing);
    if let Some(driver) = driver {
        relay = relay.driver(driver);
    }
    let relay = relay
        .build()
        .map_err(|e| ConfigError::new(format!("Failed to build relay: {}", e)))?;

    let webhooks = secrets
        .webhook_secret()
        .as_deref()
        .map(|secret| Arc::new(SignatureVerifier::new(secret)));
    if webhooks.is_none() {
        warn!("BLUEBOX_WEBHOOK_SECRET is not set; payment webhooks will be rejected");
    }

    info!(
        upstream = relay.has_driver(),
        webhooks = webhooks.is_some(),
        "Service state ready"
    );

    Ok(AppState {
        relay: Arc::new(relay),
        store: Arc::new(InMemoryUsageStore::new()),
        tier: Arc::new(config.tier.clone()),
        web,
        webhooks,
    })
}
