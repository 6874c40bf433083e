//! Trait definitions for the Bluebox chat relay.
//!
//! This crate provides the seams the relay is assembled from: the upstream
//! streaming driver and the real-time context source. Both are injected, so
//! tests substitute fakes for the network.

mod traits;
mod types;

pub use traits::{BlueboxDriver, ContextProvider, Streaming};
pub use types::{ChunkStream, FinishReason, StreamChunk};
