//! Engine configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use ariadne_a11y::{AnnouncerConfig, PlacementConfig};
use serde::{Deserialize, Serialize};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub announcer: AnnouncerConfig,
    pub placement: PlacementConfig,
    pub menu: MenuConfig,
    pub tabs: TabsConfig,
    pub forms: FormsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Delay before focus moves into a freshly opened submenu
    pub focus_delay_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { focus_delay_ms: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Arrow keys wrap around the ends of the tab list
    pub wrap: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self { wrap: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Shortest accepted value for validated inputs
    pub min_length: usize,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let announcer = &self.announcer;
        if announcer.routine_ttl_ms == 0 {
            return Err(ConfigError::Invalid("announcer.routine_ttl_ms must be positive".into()));
        }
        if announcer.feedback_ttl_ms == 0 {
            return Err(ConfigError::Invalid("announcer.feedback_ttl_ms must be positive".into()));
        }
        if announcer.history_limit == 0 {
            return Err(ConfigError::Invalid("announcer.history_limit must be positive".into()));
        }
        if !self.placement.margin.is_finite() || self.placement.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "placement.margin must be a non-negative number, got {}",
                self.placement.margin
            )));
        }
        Ok(())
    }
}
