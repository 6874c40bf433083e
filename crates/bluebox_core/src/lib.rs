//! Core conversation types for the Bluebox chat relay.
//!
//! This crate provides the data model shared by the relay, the tier policy
//! evaluator and the upstream drivers, plus the normalization helpers that turn
//! an untrusted JSON body into a [`ConversationRequest`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content;
mod intent;
mod message;
mod model_tier;
mod request;
mod role;

pub use content::{ContentPart, ImageUrl, MessageContent};
pub use intent::{IntentKind, RequestIntent, strip_legacy_tags};
pub use message::ConversationMessage;
pub use model_tier::ModelTier;
pub use request::{
    ConversationRequest, GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError,
};
pub use role::Role;
