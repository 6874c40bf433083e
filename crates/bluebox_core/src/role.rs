//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Author of a conversation message.
///
/// # Examples
///
/// ```
/// use bluebox_core::Role;
///
/// assert_eq!(Role::from_name("assistant"), Some(Role::Assistant));
/// assert_eq!(Role::from_name("tool"), None);
/// assert_eq!(format!("{}", Role::System), "system");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum Role {
    /// System messages provide context and instructions
    #[display("system")]
    System,
    /// User messages are from the human
    #[display("user")]
    User,
    /// Assistant messages are from the AI
    #[display("assistant")]
    Assistant,
}

impl Role {
    /// Parse a wire role name. Unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}
