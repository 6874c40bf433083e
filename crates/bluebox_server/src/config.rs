//! Service configuration (`bluebox.toml`) and environment secrets.

use crate::{ModelTable, PacingConfig};
use bluebox_context::ContextConfig;
use bluebox_error::{BlueboxError, BlueboxResult, ConfigError};
use bluebox_tier::TierSettings;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../bluebox.toml");

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
        }
    }
}

/// `[relay]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    /// Non-system messages forwarded upstream
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Output length cap sent with every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature sent with every request
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Name used by the default persona
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    /// Model identifiers by selection
    #[serde(default)]
    pub models: ModelTable,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            history_window: default_history_window(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            assistant_name: default_assistant_name(),
            models: ModelTable::default(),
        }
    }
}

/// Full service configuration.
///
/// Sources, lowest precedence first:
/// 1. Bundled `bluebox.toml`
/// 2. `~/.config/bluebox/bluebox.toml`
/// 3. `./bluebox.toml`
/// 4. An explicit `--config` path
///
/// # Examples
///
/// ```
/// use bluebox_server::BlueboxConfig;
///
/// let config = BlueboxConfig::bundled().unwrap();
/// assert_eq!(config.relay.history_window, 12);
/// assert_eq!(config.tier.plans.free.name, "Free");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueboxConfig {
    /// Listener and logging
    #[serde(default)]
    pub server: ServerSettings,
    /// Relay behavior
    #[serde(default)]
    pub relay: RelayConfig,
    /// Output pacing
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Real-time context sources
    #[serde(default)]
    pub context: ContextConfig,
    /// Plans and billing terms
    #[serde(flatten)]
    pub tier: TierSettings,
}

impl BlueboxConfig {
    /// Load with precedence, optionally layering `path` on top.
    #[instrument(skip(path), fields(path = ?path.map(Path::display)))]
    pub fn load(path: Option<&Path>) -> BlueboxResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bluebox/bluebox.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bluebox").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .build()
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Bundled defaults layered under TOML text.
    pub fn from_toml(text: &str) -> BlueboxResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| {
                BlueboxError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Bundled defaults only.
    pub fn bundled() -> BlueboxResult<Self> {
        Self::from_toml("")
    }
}

/// Credentials read from the environment, never from config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Secrets {
    /// `GROQ_API_KEY`
    groq_api_key: Option<String>,
    /// `BLUEBOX_WEBHOOK_SECRET`
    webhook_secret: Option<String>,
    /// `BLUEBOX_UPSTREAM_URL`, overriding `relay.upstream_url`
    upstream_url: Option<String>,
}

impl Secrets {
    /// Read the process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            groq_api_key: non_blank_var("GROQ_API_KEY"),
            webhook_secret: non_blank_var("BLUEBOX_WEBHOOK_SECRET"),
            upstream_url: non_blank_var("BLUEBOX_UPSTREAM_URL"),
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "info,tower_http=debug".to_string()
}

fn default_upstream_url() -> String {
    bluebox_models::GROQ_ENDPOINT.to_string()
}

fn default_history_window() -> usize {
    12
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.7
}

fn default_assistant_name() -> String {
    "Bluebox".to_string()
}
