//! Payment webhook errors.

/// Webhook verification and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PaymentErrorKind {
    /// Webhook secret is not configured
    #[display("Configuration Error")]
    NotConfigured,

    /// Signature header is absent
    #[display("Missing signature")]
    MissingSignature,

    /// Signature does not match the body
    #[display("Invalid signature")]
    InvalidSignature,

    /// Event payload could not be decoded
    #[display("Malformed event: {}", _0)]
    MalformedEvent(String),
}

impl PaymentErrorKind {
    /// HTTP status code this failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentErrorKind::NotConfigured => 500,
            PaymentErrorKind::MissingSignature
            | PaymentErrorKind::InvalidSignature
            | PaymentErrorKind::MalformedEvent(_) => 400,
        }
    }
}

/// Payment error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Payment Error: {} at line {} in {}", kind, line, file)]
pub struct PaymentError {
    kind: PaymentErrorKind,
    line: u32,
    file: &'static str,
}

impl PaymentError {
    /// Create a new payment error with caller location tracking.
    #[track_caller]
    pub fn new(kind: PaymentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PaymentErrorKind {
        &self.kind
    }
}
