//! Upstream fragments to response body bytes.

use crate::Pacing;
use axum::body::Bytes;
use bluebox_core::ModelTier;
use bluebox_interface::ChunkStream;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error};

/// Body stream for a relayed completion.
///
/// Items are raw UTF-8 text with no framing. Dropping the stream drops the
/// upstream connection with it.
pub type RelayStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Forward non-empty fragments in arrival order, pausing per `pacing`.
///
/// A mid-stream upstream failure is logged and ends the body. Bytes already
/// sent stay sent; there is no in-band error marker.
pub fn relay_fragments(upstream: ChunkStream, pacing: Arc<dyn Pacing>, tier: ModelTier) -> RelayStream {
    let stream = async_stream::stream! {
        let mut upstream = upstream;
        let mut fragments = 0usize;
        let mut bytes = 0usize;

        while let Some(item) = upstream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    error!(error = %e, fragments, bytes, "Upstream stream failed, closing response");
                    break;
                }
            };

            if !chunk.content.is_empty() {
                if let Some(delay) = pacing.delay(tier) {
                    tokio::time::sleep(delay).await;
                }
                fragments += 1;
                bytes += chunk.content.len();
                yield Bytes::from(chunk.content);
            }

            if chunk.is_final {
                debug!(finish_reason = ?chunk.finish_reason, "Upstream finished");
                break;
            }
        }

        debug!(fragments, bytes, "Relay stream complete");
    };
    Box::pin(stream)
}
