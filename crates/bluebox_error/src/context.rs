//! Errors raised while fetching real-time context.

/// Context source failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContextErrorKind {
    /// Query parameter was absent or empty
    #[display("Missing query parameter")]
    MissingQuery,

    /// Remote site could not be reached or returned an error status
    #[display("Could not access the web: {}", _0)]
    Fetch(String),

    /// URL points at a host the provider refuses to fetch
    #[display("URL not allowed: {}", _0)]
    BlockedHost(String),

    /// Remote payload could not be decoded
    #[display("Could not parse response: {}", _0)]
    Parse(String),
}

/// Context error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Context Error: {} at line {} in {}", kind, line, file)]
pub struct ContextError {
    kind: ContextErrorKind,
    line: u32,
    file: &'static str,
}

impl ContextError {
    /// Create a new context error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ContextErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ContextErrorKind {
        &self.kind
    }
}
