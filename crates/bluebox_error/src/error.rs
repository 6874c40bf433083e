//! Top-level error wrapper types.

use crate::{
    ConfigError, ContextError, ModelsError, PaymentError, RelayError, StoreError, TierError,
};

/// Every error condition the Bluebox crates can raise.
///
/// # Examples
///
/// ```
/// use bluebox_error::{BlueboxError, StoreError, StoreErrorKind};
///
/// let store_err = StoreError::new(StoreErrorKind::NotFound("alice".to_string()));
/// let err: BlueboxError = store_err.into();
/// assert!(format!("{}", err).contains("alice"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BlueboxErrorKind {
    /// Configuration error
    Config(ConfigError),
    /// Completion relay error
    Relay(RelayError),
    /// Upstream model provider error
    Models(ModelsError),
    /// Tier policy error
    Tier(TierError),
    /// Document store error
    Store(StoreError),
    /// Payment webhook error
    Payment(PaymentError),
    /// Real-time context error
    Context(ContextError),
}

/// Bluebox error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bluebox_error::{BlueboxErrorKind, BlueboxResult, ConfigError};
///
/// fn might_fail() -> BlueboxResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), BlueboxErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bluebox Error: {}", _0)]
pub struct BlueboxError(Box<BlueboxErrorKind>);

impl BlueboxError {
    /// Create a new error from a kind.
    pub fn new(kind: BlueboxErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BlueboxErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BlueboxErrorKind
impl<T> From<T> for BlueboxError
where
    T: Into<BlueboxErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bluebox operations.
pub type BlueboxResult<T> = std::result::Result<T, BlueboxError>;
