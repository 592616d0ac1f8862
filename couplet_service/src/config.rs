// Service configuration: listen port, request clamping, and engine tuning.
//
// Loaded from an optional JSON file; omitted fields keep their defaults and
// the nested `engine` section is an `EngineConfig`. CLI flags override the
// loaded values in `main.rs`.

use std::path::Path;

use couplet_engine::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listen port for `serve`.
    pub port: u16,
    /// Smallest batch a request can ask for.
    pub min_couplets: usize,
    /// Largest batch a request can ask for.
    pub max_couplets: usize,
    /// Batch size when a request does not say.
    pub default_couplets: usize,
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            min_couplets: 1,
            max_couplets: 10,
            default_couplets: 5,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ServiceError> {
        let json = std::fs::read_to_string(path).map_err(|source| ServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_couplets > self.max_couplets {
            return Err(ConfigError::Invalid {
                field: "min_couplets",
                reason: format!(
                    "{} exceeds max_couplets {}",
                    self.min_couplets, self.max_couplets
                ),
            });
        }
        self.engine.validate()
    }

    /// Clamp a requested batch size into `[min_couplets, max_couplets]`,
    /// using `default_couplets` when none was given.
    pub fn clamp_count(&self, requested: Option<i64>) -> usize {
        let min = i64::try_from(self.min_couplets).unwrap_or(i64::MAX);
        let max = i64::try_from(self.max_couplets).unwrap_or(i64::MAX);
        let wanted = match requested {
            Some(n) => n,
            None => i64::try_from(self.default_couplets).unwrap_or(i64::MAX),
        };
        usize::try_from(wanted.clamp(min, max)).unwrap_or(self.max_couplets)
    }
}
