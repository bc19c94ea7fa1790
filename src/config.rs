//=========================================================================
// Engine Configuration
//=========================================================================
//
// Tunables for the engine facade, loadable from TOML.
//
// Example file:
//   tps = 60.0
//   max_frame_delta_ms = 250.0
//   event_channel_capacity = 128
//   log_filter = "proscenium=debug"
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== EngineConfig ========================================================

/// Settings consumed by [`EngineBuilder`](crate::EngineBuilder).
///
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks per second used by `Engine::run_frames`.
    pub tps: f64,

    /// Upper bound, in milliseconds, for a single tick's delta.
    pub max_frame_delta_ms: f64,

    /// Capacity of each scene event subscriber channel.
    pub event_channel_capacity: usize,

    /// `env_logger` filter directive, e.g. `"proscenium=debug"`.
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            max_frame_delta_ms: 250.0,
            event_channel_capacity: 128,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    //--- Loading ----------------------------------------------------------

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. Only `.toml` files are supported.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    //--- Validation -------------------------------------------------------

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tps.is_finite() && self.tps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tps",
                reason: format!("must be positive, got {}", self.tps),
            });
        }
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_frame_delta_ms",
                reason: format!("must be positive, got {}", self.max_frame_delta_ms),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_channel_capacity",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_toml(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

//=== Tests ===============================================================
