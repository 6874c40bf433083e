//! Error types for the Bluebox chat relay.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use bluebox_error::{BlueboxResult, RelayError, RelayErrorKind};
//!
//! fn relay() -> BlueboxResult<()> {
//!     Err(RelayError::new(RelayErrorKind::EmptyConversation))?
//! }
//!
//! assert!(relay().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod error;
mod models;
mod payment;
mod relay;
mod store;
mod tier;

pub use config::ConfigError;
pub use context::{ContextError, ContextErrorKind};
pub use error::{BlueboxError, BlueboxErrorKind, BlueboxResult};
pub use models::{ModelsError, ModelsErrorKind, ModelsResult};
pub use payment::{PaymentError, PaymentErrorKind};
pub use relay::{RelayError, RelayErrorKind};
pub use store::{StoreError, StoreErrorKind};
pub use tier::{TierError, TierErrorKind};
