//! Tier policy errors.

/// Specific tier policy error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TierErrorKind {
    /// Plan configuration could not be loaded or parsed
    #[display("Plan configuration error: {}", _0)]
    Config(String),

    /// Daily message allowance is used up
    #[display("Daily message limit reached ({}/day). Upgrade to Pro for unlimited messages.", _0)]
    LimitReached(u64),

    /// A plan name did not match any configured plan
    #[display("Unknown plan: {}", _0)]
    UnknownPlan(String),
}

/// Tier policy error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tier Error: {} at line {} in {}", kind, line, file)]
pub struct TierError {
    kind: TierErrorKind,
    line: u32,
    file: &'static str,
}

impl TierError {
    /// Create a new tier error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TierErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TierErrorKind {
        &self.kind
    }
}
