//! Configuration loading and typed config structures for the service.
//!
//! The canonical configuration lives in `veldt-config.yaml` at the project
//! root. Every field has a default, so an absent file yields a fully
//! working local setup.

use std::path::Path;

use serde::Deserialize;

use veldt_world::WorldRules;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unusable world.
    #[error("invalid config: {message}")]
    Invalid {
        /// What constraint the configuration violates.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// Broker connection settings.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Tick and cooldown timing.
    #[serde(default)]
    pub tick: TickConfig,

    /// Predator and consumption-rule constants.
    #[serde(default)]
    pub predator: PredatorConfig,

    /// Restart policy for the outer supervisory loop.
    #[serde(default)]
    pub restart: RestartConfig,
}

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerConfig {
    /// NATS server URL.
    #[serde(default = "default_broker_url")]
    pub url: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: default_broker_url(),
        }
    }
}

/// Tick and cooldown timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TickConfig {
    /// Fixed delay between simulation ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub interval_ms: u64,
    /// Cooldown after the predator becomes full.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_interval_ms(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

/// Predator and consumption-rule constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PredatorConfig {
    /// Weight threshold at which the predator becomes full.
    #[serde(default = "default_max_weight")]
    pub max_weight: u32,
    /// Consumption radius for prey distance.
    #[serde(default = "default_prey_radius")]
    pub prey_radius: u32,
    /// Per-axis consumption radius for resources.
    #[serde(default = "default_resource_radius")]
    pub resource_radius: u32,
    /// Lower bound of the roaming coordinates (inclusive).
    #[serde(default = "default_roam_min")]
    pub roam_min: i32,
    /// Upper bound of the roaming coordinates (inclusive).
    #[serde(default = "default_roam_max")]
    pub roam_max: i32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            max_weight: default_max_weight(),
            prey_radius: default_prey_radius(),
            resource_radius: default_resource_radius(),
            roam_min: default_roam_min(),
            roam_max: default_roam_max(),
        }
    }
}

/// Restart policy for the outer supervisory loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RestartConfig {
    /// Delay before rebuilding the component graph after a failure.
    #[serde(default = "default_restart_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_restart_delay_ms(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file, falling back to defaults when the file does
    /// not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found; using defaults");
            Ok(Self::default())
        }
    }

    /// Reject configurations the simulation cannot run with. The roaming
    /// bounds feed an inclusive range sampler, so an inverted pair would
    /// panic deep inside the tick task instead of failing at startup.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.predator.roam_min > self.predator.roam_max {
            return Err(ConfigError::Invalid {
                message: format!(
                    "predator.roam_min ({}) must not exceed predator.roam_max ({})",
                    self.predator.roam_min, self.predator.roam_max
                ),
            });
        }
        if self.predator.max_weight == 0 {
            return Err(ConfigError::Invalid {
                message: "predator.max_weight must be positive".to_owned(),
            });
        }
        Ok(())
    }

    /// The world rules this configuration describes.
    pub const fn rules(&self) -> WorldRules {
        WorldRules {
            max_weight: self.predator.max_weight,
            prey_radius: self.predator.prey_radius,
            resource_radius: self.predator.resource_radius,
            roam_min: self.predator.roam_min,
            roam_max: self.predator.roam_max,
        }
    }
}

fn default_broker_url() -> String {
    "nats://localhost:4222".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_cooldown_ms() -> u64 {
    5000
}

const fn default_max_weight() -> u32 {
    30
}

const fn default_prey_radius() -> u32 {
    30
}

const fn default_resource_radius() -> u32 {
    5
}

const fn default_roam_min() -> i32 {
    -50
}

const fn default_roam_max() -> i32 {
    50
}

const fn default_restart_delay_ms() -> u64 {
    2000
}
