//! Error types for the completion relay.

/// Failure conditions recognised at the relay boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RelayErrorKind {
    /// Request body could not be parsed
    #[display("Malformed request body: {}", _0)]
    MalformedRequestBody(String),

    /// No valid message survived filtering
    #[display("No messages provided")]
    EmptyConversation,

    /// Upstream provider failed before streaming began
    #[display("Chat failed: {}", _0)]
    UpstreamFailure(String),

    /// A required setting (usually an API credential) is absent
    #[display("Configuration missing: {}", _0)]
    ConfigurationMissing(String),
}

impl RelayErrorKind {
    /// HTTP status code this failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayErrorKind::MalformedRequestBody(_) | RelayErrorKind::EmptyConversation => 400,
            RelayErrorKind::UpstreamFailure(_) => 502,
            RelayErrorKind::ConfigurationMissing(_) => 500,
        }
    }
}

/// Relay error with location tracking.
///
/// # Examples
///
/// ```
/// use bluebox_error::{RelayError, RelayErrorKind};
///
/// let err = RelayError::new(RelayErrorKind::EmptyConversation);
/// assert_eq!(err.kind().status_code(), 400);
/// assert_eq!(err.kind().to_string(), "No messages provided");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Relay Error: {} at line {} in {}", kind, line, file)]
pub struct RelayError {
    kind: RelayErrorKind,
    line: u32,
    file: &'static str,
}

impl RelayError {
    /// Create a new relay error with caller location tracking.
    #[track_caller]
    pub fn new(kind: RelayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RelayErrorKind {
        &self.kind
    }
}

impl From<RelayErrorKind> for RelayError {
    #[track_caller]
    fn from(kind: RelayErrorKind) -> Self {
        Self::new(kind)
    }
}
