//! Shared handler state.

use crate::{CompletionRelay, SignatureVerifier};
use bluebox_context::WebContextProvider;
use bluebox_store::UsageStore;
use bluebox_tier::TierSettings;
use std::sync::Arc;

/// State handed to every route.
#[derive(Clone)]
pub struct AppState {
    /// Chat relay
    pub relay: Arc<CompletionRelay>,
    /// Usage record store
    pub store: Arc<dyn UsageStore>,
    /// Plans and billing terms
    pub tier: Arc<TierSettings>,
    /// Web and news lookups for the context routes
    pub web: Arc<WebContextProvider>,
    /// Payment webhook verifier; `None` when no secret is configured
    pub webhooks: Option<Arc<SignatureVerifier>>,
}
