//! Configuration module
//!
//! - `connector` - Tenant-scoped connector properties for claim update handlers
//! - `environment` - Environment detection and logging configuration

pub mod connector;
pub mod environment;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use connector::ConnectorSettings;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides, e.g.
/// `MOBILE_VERIFICATION__LOGGING__LEVEL=trace`
pub const ENV_PREFIX: &str = "MOBILE_VERIFICATION";

/// Complete application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Connector properties (defaults and tenant overrides)
    #[serde(default)]
    pub connectors: ConnectorSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            logging: LoggingConfig::for_environment(env),
            connectors: ConnectorSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults for the environment named by `ENVIRONMENT`/`ENV`/`RUST_ENV`
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            logging: LoggingConfig::for_environment(env),
            connectors: ConnectorSettings::default(),
        }
    }

    /// Load configuration from an optional TOML file, then apply
    /// `MOBILE_VERIFICATION__*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::from_env();
        let path = path.as_ref().to_string_lossy().into_owned();

        config::Config::builder()
            .set_default("environment", defaults.environment.to_string())?
            .set_default("logging.level", defaults.logging.level.clone())?
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}
