use super::handler::MAX_RESOLVE_PASSES;
use crate::utils::{Float, V2};
use serde::{Deserialize, Serialize};

/// Which way is "up" for standing on platforms.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UpDirection {
    /// screen coordinates, y grows downward
    NegativeY,
    PositiveY,
}

impl UpDirection {
    pub fn vector(self) -> V2 {
        match self {
            UpDirection::NegativeY => V2::new(0.0, -1.0),
            UpDirection::PositiveY => V2::new(0.0, 1.0),
        }
    }
}

/// Tunables of a `CollisionWorld`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub gravity_x: Float,
    pub gravity_y: Float,
    /// bound on re-sweeps per actor and tick
    pub max_resolve_passes: usize,
    pub up: UpDirection,
    /// how far below an attached actor the platform is still looked for
    pub attach_probe_distance: Float,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        CollisionConfig {
            gravity_x: 0.0,
            gravity_y: 0.0,
            max_resolve_passes: MAX_RESOLVE_PASSES,
            up: UpDirection::NegativeY,
            attach_probe_distance: 0.001,
        }
    }
}

impl CollisionConfig {
    pub fn gravity(&self) -> V2 {
        V2::new(self.gravity_x, self.gravity_y)
    }

    /// Parses a RON document, missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<CollisionConfig, ConfigError> {
        let config: CollisionConfig =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, Default::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolve_passes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_resolve_passes",
                reason: "at least one pass is required".to_string(),
            });
        }
        if !self.gravity_x.is_finite() || !self.gravity_y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: format!("({}, {}) is not finite", self.gravity_x, self.gravity_y),
            });
        }
        if !(self.attach_probe_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "attach_probe_distance",
                reason: format!("{} is negative", self.attach_probe_distance),
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
