//! Game tuning configuration with documented constants
//!
//! The config is loaded once at startup and passed by reference into every
//! `Adventure`. Values not present in a config file keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the progression rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === HINT ECONOMY ===
    /// Hints allowed per chapter on Heroic
    ///
    /// Usage is tracked per chapter id, so the quota refreshes when the
    /// player enters a new chapter but not when they restart one.
    pub heroic_hint_quota: u32,

    /// XP charged per hint on Mythic
    ///
    /// Checked against lifetime XP. A player with less banked XP than this
    /// cannot buy a hint at all.
    pub mythic_hint_cost: u32,

    // === REWARDS ===
    /// Divisor applied to the base reward on a Partial outcome
    ///
    /// Partial credit is never scaled by difficulty or mode.
    pub partial_xp_divisor: u32,

    /// Clear time (seconds) passed along with the speed trigger
    ///
    /// The achievement collaborator decides what counts as fast; this is
    /// forwarded as the threshold in the trigger context.
    pub speed_clear_seconds: f64,

    // === DISPLAY ===
    /// Character used to mask unrevealed solution characters
    pub reveal_mask: char,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            heroic_hint_quota: 3,
            mythic_hint_cost: 25,
            partial_xp_divisor: 2,
            speed_clear_seconds: 60.0,
            reveal_mask: '*',
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partial_xp_divisor == 0 {
            return Err(ConfigError::Invalid(
                "partial_xp_divisor must be at least 1".into(),
            ));
        }

        if !self.speed_clear_seconds.is_finite() || self.speed_clear_seconds <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "speed_clear_seconds ({}) must be a positive number",
                self.speed_clear_seconds
            )));
        }

        Ok(())
    }
}
