use serde::{Deserialize, Serialize};

/// Model quality tier requested by the caller.
///
/// Anything other than `"premium"` on the wire means basic.
///
/// ```
/// use bluebox_core::ModelTier;
///
/// assert_eq!(ModelTier::from_flag(Some("premium")), ModelTier::Premium);
/// assert_eq!(ModelTier::from_flag(Some("gold")), ModelTier::Basic);
/// assert_eq!(ModelTier::from_flag(None), ModelTier::Basic);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Smaller, faster model with paced output
    #[default]
    #[display("basic")]
    Basic,
    /// Larger model, unpaced output
    #[display("premium")]
    Premium,
}

impl ModelTier {
    /// Interpret the optional `modelTier` flag of a request.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("premium") => ModelTier::Premium,
            _ => ModelTier::Basic,
        }
    }
}
