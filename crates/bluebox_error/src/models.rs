//! Upstream model provider errors.

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// Transport failure talking to the provider
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// Provider answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Provider rejected the request due to rate limiting
    #[display("Rate limit exceeded")]
    RateLimit,

    /// Stream broke after it was opened
    #[display("Stream error: {}", _0)]
    Stream(String),

    /// A stream chunk or response could not be decoded
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),

    /// API credential was not supplied
    #[display("Missing API key: {}", _0)]
    MissingApiKey(String),

    /// Builder error (derive_builder failures)
    #[display("Builder error: {}", _0)]
    Builder(String),
}

/// Model provider error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for model operations.
pub type ModelsResult<T> = Result<T, ModelsError>;
