//! Mock upstream backend for relay tests.

use async_trait::async_trait;
use bluebox_context::{ContextConfig, WebContextProvider};
use bluebox_core::{GenerateRequest, ModelTier};
use bluebox_error::{BlueboxError, BlueboxResult, ContextError, ContextErrorKind, ModelsError, ModelsErrorKind};
use bluebox_interface::{
    BlueboxDriver, ChunkStream, ContextProvider, FinishReason, StreamChunk, Streaming,
};
use bluebox_server::{AppState, CompletionRelay, NoPacing, Pacing, RelayConfig, SignatureVerifier};
use bluebox_store::InMemoryUsageStore;
use bluebox_tier::TierSettings;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted stream item.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Yield a text fragment
    Text(&'static str),
    /// Yield a mid-stream error
    Fail(&'static str),
    /// Never produce another item
    Hang,
}

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Mock streaming backend.
///
/// Records every request it receives and replays a fixed script.
#[derive(Clone)]
pub struct MockDriver {
    script: Vec<MockStep>,
    reject: Option<ModelsErrorKind>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    dropped: Arc<AtomicBool>,
}

impl MockDriver {
    /// Driver that streams `script`.
    pub fn new(script: Vec<MockStep>) -> Self {
        Self {
            script,
            reject: None,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Driver that streams the given fragments and finishes.
    pub fn streaming(fragments: &[&'static str]) -> Self {
        Self::new(fragments.iter().copied().map(MockStep::Text).collect())
    }

    /// Driver that refuses to open a stream.
    pub fn rejecting(kind: ModelsErrorKind) -> Self {
        Self {
            reject: Some(kind),
            ..Self::new(Vec::new())
        }
    }

    /// Number of `generate_stream` calls.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Whether the last opened stream has been dropped.
    pub fn stream_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

impl BlueboxDriver for MockDriver {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn endpoint(&self) -> &str {
        "mock://upstream"
    }
}

#[async_trait]
impl Streaming for MockDriver {
    async fn generate_stream(&self, req: &GenerateRequest) -> BlueboxResult<ChunkStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req.clone());

        if let Some(kind) = self.reject.clone() {
            return Err(ModelsError::new(kind).into());
        }

        let script = self.script.clone();
        let flag = Arc::clone(&self.dropped);
        let stream = async_stream::stream! {
            let _guard = DropFlag(flag);
            for step in script {
                match step {
                    MockStep::Text(text) => {
                        yield Ok(StreamChunk::text(text));
                    }
                    MockStep::Fail(message) => {
                        let kind = ModelsErrorKind::Stream(message.to_string());
                        yield Err(BlueboxError::from(ModelsError::new(kind)));
                    }
                    MockStep::Hang => {
                        futures_util::future::pending::<()>().await;
                    }
                }
            }
            yield Ok(StreamChunk::finished(FinishReason::Stop));
        };
        Ok(Box::pin(stream))
    }
}

/// Context provider with canned answers.
#[derive(Clone, Default)]
pub struct MockContext {
    queries: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockContext {
    /// Provider whose lookups all fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Queries passed to `web_context`.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextProvider for MockContext {
    async fn web_context(&self, query: &str) -> BlueboxResult<String> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(ContextError::new(ContextErrorKind::Fetch("offline".to_string())).into());
        }
        Ok(format!("Search results for \"{query}\":\n1. Result"))
    }

    async fn news_context(&self) -> BlueboxResult<String> {
        if self.fail {
            return Err(ContextError::new(ContextErrorKind::Fetch("offline".to_string())).into());
        }
        Ok("Latest headlines:\n- Markets rally (Reuters)".to_string())
    }
}

/// Pacing that counts calls and never sleeps.
#[derive(Debug, Default)]
pub struct RecordingPacing {
    tiers: Mutex<Vec<ModelTier>>,
}

impl RecordingPacing {
    /// Tiers passed to `delay`, in call order.
    pub fn tiers(&self) -> Vec<ModelTier> {
        self.tiers.lock().unwrap().clone()
    }
}

impl Pacing for RecordingPacing {
    fn delay(&self, tier: ModelTier) -> Option<Duration> {
        self.tiers.lock().unwrap().push(tier);
        None
    }
}

/// Relay over `driver` with default settings and no pacing.
pub fn test_relay(driver: Option<MockDriver>, context: Option<MockContext>) -> CompletionRelay {
    let mut builder = CompletionRelay::builder()
        .config(RelayConfig::default())
        .pacing(Arc::new(NoPacing));
    if let Some(driver) = driver {
        builder = builder.driver(Arc::new(driver));
    }
    if let Some(context) = context {
        builder = builder.context(Arc::new(context));
    }
    builder.build().unwrap()
}

/// Handler state around `relay`, an empty store and bundled plans.
pub fn test_state(relay: CompletionRelay, webhook_secret: Option<&str>) -> AppState {
    AppState {
        relay: Arc::new(relay),
        store: Arc::new(InMemoryUsageStore::new()),
        tier: Arc::new(TierSettings::bundled().unwrap()),
        web: Arc::new(WebContextProvider::new(ContextConfig::default()).unwrap()),
        webhooks: webhook_secret.map(|secret| Arc::new(SignatureVerifier::new(secret))),
    }
}
