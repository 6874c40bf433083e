//! Plan definitions and their TOML configuration.
//!
//! Plans are read from the `[plans]` and `[billing]` tables of `bluebox.toml`:
//! - Bundled defaults (embedded from the repository's `bluebox.toml`)
//! - Any file handed to [`TierSettings::from_file`]
//!
//! # Example
//!
//! ```toml
//! [plans.free]
//! name = "Free"
//! message_limit = 25
//! token_limit = 10_000
//! model_tier = "basic"
//!
//! [plans.pro]
//! name = "Pro"
//! message_limit = "unlimited"
//! token_limit = "unlimited"
//! model_tier = "premium"
//! ```

use crate::{BillingCycle, UsageLimit};
use bluebox_core::ModelTier;
use bluebox_error::{BlueboxError, BlueboxResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bluebox.toml");

/// Limits and model tier granted by a subscription plan.
pub trait Plan {
    /// Daily message cap.
    fn message_limit(&self) -> UsageLimit;

    /// Daily token cap.
    fn token_limit(&self) -> UsageLimit;

    /// Model tier the plan grants.
    fn model_tier(&self) -> ModelTier;

    /// Display name.
    fn name(&self) -> &str;
}

/// A plan loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Display name (e.g., "Free", "Pro")
    pub name: String,
    /// Daily message cap
    pub message_limit: UsageLimit,
    /// Daily token cap
    pub token_limit: UsageLimit,
    /// Model tier granted
    pub model_tier: ModelTier,
}

impl Plan for PlanConfig {
    fn message_limit(&self) -> UsageLimit {
        self.message_limit
    }

    fn token_limit(&self) -> UsageLimit {
        self.token_limit
    }

    fn model_tier(&self) -> ModelTier {
        self.model_tier
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The two account plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlansConfig {
    /// Default plan for new and lapsed accounts
    pub free: PlanConfig,
    /// Paid plan
    pub pro: PlanConfig,
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            free: PlanConfig {
                name: "Free".to_string(),
                message_limit: UsageLimit::Limited(25),
                token_limit: UsageLimit::Limited(10_000),
                model_tier: ModelTier::Basic,
            },
            pro: PlanConfig {
                name: "Pro".to_string(),
                message_limit: UsageLimit::Unlimited,
                token_limit: UsageLimit::Unlimited,
                model_tier: ModelTier::Premium,
            },
        }
    }
}

/// Subscription term lengths in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Days granted by a monthly payment
    pub monthly_days: i64,
    /// Days granted by a yearly payment
    pub yearly_days: i64,
}

impl BillingConfig {
    /// Term length for a billing cycle.
    pub fn days(&self, cycle: BillingCycle) -> i64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_days,
            BillingCycle::Yearly => self.yearly_days,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            monthly_days: 30,
            yearly_days: 365,
        }
    }
}

/// Tier-related configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSettings {
    /// Plan definitions
    pub plans: PlansConfig,
    /// Subscription term lengths
    #[serde(default)]
    pub billing: BillingConfig,
}

impl TierSettings {
    /// Load tier settings from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BlueboxResult<Self> {
        debug!("Loading tier settings from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to parse tier settings: {}",
                    e
                )))
            })
    }

    /// Parse tier settings from TOML text.
    pub fn from_toml(text: &str) -> BlueboxResult<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to parse tier settings: {}",
                    e
                )))
            })
    }

    /// Settings from the bundled defaults only.
    pub fn bundled() -> BlueboxResult<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }
}
