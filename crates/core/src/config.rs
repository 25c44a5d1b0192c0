//! Session settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "cadence_millis": 5000, "subscription": { "timeout_millis": 20000 } }
//! ```

use serde::{Deserialize, Serialize};
use warmer_location::SubscriptionOptions;

use crate::throttle::DEFAULT_WINDOW_MILLIS;

pub const DEFAULT_TICK_MILLIS: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cadence_millis must be positive, got {0}")]
    InvalidCadence(i64),

    #[error("tick_millis must be positive")]
    InvalidTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum time between accepted samples
    pub cadence_millis: i64,

    /// Display timer period
    pub tick_millis: u64,

    pub subscription: SubscriptionOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cadence_millis: DEFAULT_WINDOW_MILLIS,
            tick_millis: DEFAULT_TICK_MILLIS,
            subscription: SubscriptionOptions::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cadence_millis <= 0 {
            return Err(ConfigError::InvalidCadence(self.cadence_millis));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::InvalidTick);
        }
        Ok(())
    }
}
