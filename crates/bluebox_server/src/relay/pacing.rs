//! Per-tier output pacing.
//!
//! Basic-tier responses are slowed slightly between fragments. The delay is a
//! product setting, so it sits behind a trait the relay receives at
//! construction and tests replace with [`NoPacing`].

use bluebox_core::ModelTier;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Chooses the pause inserted before each outgoing fragment.
pub trait Pacing: Send + Sync + Debug {
    /// Delay before the next fragment for `tier`, or `None` to send at once.
    fn delay(&self, tier: ModelTier) -> Option<Duration>;
}

/// Never delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacing for NoPacing {
    fn delay(&self, _tier: ModelTier) -> Option<Duration> {
        None
    }
}

/// Base delay plus uniform jitter in `[0, jitter)`, both in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaceWindow {
    base_ms: u64,
    jitter_ms: u64,
}

impl PaceWindow {
    /// Window from millisecond values.
    pub fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// Whether the window always yields zero.
    pub fn is_zero(&self) -> bool {
        self.base_ms == 0 && self.jitter_ms == 0
    }

    fn sample(&self) -> Option<Duration> {
        if self.is_zero() {
            return None;
        }
        let extra = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        };
        Some(Duration::from_millis(self.base_ms.saturating_add(extra)))
    }
}

/// Separate windows for each tier.
///
/// ```
/// use bluebox_core::ModelTier;
/// use bluebox_server::{Pacing, TierPacing};
/// use std::time::Duration;
///
/// let pacing = TierPacing::default();
/// let delay = pacing.delay(ModelTier::Basic).unwrap();
/// assert!(delay >= Duration::from_millis(60) && delay < Duration::from_millis(80));
/// assert_eq!(pacing.delay(ModelTier::Premium), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPacing {
    basic: PaceWindow,
    premium: PaceWindow,
}

impl TierPacing {
    /// Pacing with explicit windows.
    pub fn new(basic: PaceWindow, premium: PaceWindow) -> Self {
        Self { basic, premium }
    }
}

impl Default for TierPacing {
    fn default() -> Self {
        Self::new(PaceWindow::from_millis(60, 20), PaceWindow::default())
    }
}

impl Pacing for TierPacing {
    fn delay(&self, tier: ModelTier) -> Option<Duration> {
        match tier {
            ModelTier::Basic => self.basic.sample(),
            ModelTier::Premium => self.premium.sample(),
        }
    }
}

/// `[pacing]` section of `bluebox.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// `false` disables pacing entirely
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Basic-tier base delay
    #[serde(default = "default_basic_base_ms")]
    pub basic_base_ms: u64,
    /// Basic-tier jitter bound
    #[serde(default = "default_basic_jitter_ms")]
    pub basic_jitter_ms: u64,
    /// Premium-tier base delay
    #[serde(default)]
    pub premium_base_ms: u64,
    /// Premium-tier jitter bound
    #[serde(default)]
    pub premium_jitter_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            basic_base_ms: default_basic_base_ms(),
            basic_jitter_ms: default_basic_jitter_ms(),
            premium_base_ms: 0,
            premium_jitter_ms: 0,
        }
    }
}

impl PacingConfig {
    /// Strategy described by this section.
    pub fn strategy(&self) -> Arc<dyn Pacing> {
        if !self.enabled {
            return Arc::new(NoPacing);
        }
        Arc::new(TierPacing::new(
            PaceWindow::from_millis(self.basic_base_ms, self.basic_jitter_ms),
            PaceWindow::from_millis(self.premium_base_ms, self.premium_jitter_ms),
        ))
    }
}

fn default_enabled() -> bool {
    true
}

fn default_basic_base_ms() -> u64 {
    60
}

fn default_basic_jitter_ms() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_within_the_configured_window() {
        let window = PaceWindow::from_millis(10, 5);
        for _ in 0..200 {
            let delay = window.sample().unwrap();
            assert!(delay >= Duration::from_millis(10) && delay < Duration::from_millis(15));
        }
    }

    #[test]
    fn base_only_window_is_exact() {
        let window = PaceWindow::from_millis(25, 0);
        assert_eq!(window.sample(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn zero_window_sends_at_once() {
        assert!(PaceWindow::default().is_zero());
        assert_eq!(PaceWindow::default().sample(), None);
    }

    #[test]
    fn extreme_values_saturate_instead_of_wrapping() {
        let window = PaceWindow::from_millis(u64::MAX, u64::MAX);
        let delay = window.sample().unwrap();
        assert_eq!(delay, Duration::from_millis(u64::MAX));
    }
}
