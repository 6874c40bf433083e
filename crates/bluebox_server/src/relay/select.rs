//! Upstream model selection.

use bluebox_core::ModelTier;
use serde::{Deserialize, Serialize};

/// Which configured model serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelSelection {
    /// Multimodal model, chosen whenever an image is present
    #[display("vision")]
    Vision,
    /// Large text model for premium callers
    #[display("premium")]
    Premium,
    /// Small text model
    #[display("basic")]
    Basic,
}

impl ModelSelection {
    /// Images take precedence over the requested tier.
    ///
    /// ```
    /// use bluebox_core::ModelTier;
    /// use bluebox_server::ModelSelection;
    ///
    /// assert_eq!(ModelSelection::choose(true, ModelTier::Basic), ModelSelection::Vision);
    /// assert_eq!(ModelSelection::choose(false, ModelTier::Premium), ModelSelection::Premium);
    /// ```
    pub fn choose(has_image: bool, tier: ModelTier) -> Self {
        match (has_image, tier) {
            (true, _) => ModelSelection::Vision,
            (false, ModelTier::Premium) => ModelSelection::Premium,
            (false, ModelTier::Basic) => ModelSelection::Basic,
        }
    }
}

/// Model identifiers from `[relay.models]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTable {
    /// Model used when any retained message carries an image
    pub vision: String,
    /// Model for premium text requests
    pub premium: String,
    /// Model for basic text requests
    pub basic: String,
}

impl ModelTable {
    /// Identifier for a selection.
    pub fn model_for(&self, selection: ModelSelection) -> &str {
        match selection {
            ModelSelection::Vision => &self.vision,
            ModelSelection::Premium => &self.premium,
            ModelSelection::Basic => &self.basic,
        }
    }
}

impl Default for ModelTable {
    fn default() -> Self {
        Self {
            vision: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            premium: "llama-3.3-70b-versatile".to_string(),
            basic: "llama-3.1-8b-instant".to_string(),
        }
    }
}
