//! Container configuration is loaded into [ContainerConfig], which the
//! [Application](crate::application::Application) uses to configure itself. The config is also
//! registered in the container under [CONFIG_ALIAS], so it can be injected into other types.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `WIREUP_` or `wireup.json` file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use wireup_di::pool_storage::SharedPoolStorage;

const CONFIG_ENV_PREFIX: &str = "WIREUP";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "wireup.json";

/// Alias of the config instance registered in bootstrapped containers.
pub const CONFIG_ALIAS: &str = "wireup.config";

/// Kind of storage used to cache described parameter lists.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStorageKind {
    /// In-memory storage local to a single container.
    #[default]
    Array,
    /// Storage shared between containers, with expiring entries.
    Shared,
}

#[non_exhaustive]
#[derive(Clone, PartialEq, Debug)]
pub struct ContainerConfig {
    /// Should a default tracing logger be installed when bootstrapping.
    pub install_tracing_logger: bool,
    /// Should constructible types resolve without explicit definitions.
    pub auto_register_types: bool,
    pub pool_storage: PoolStorageKind,
    /// Time to live of shared pool entries, in seconds.
    pub pool_ttl_secs: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            auto_register_types: true,
            pool_storage: PoolStorageKind::default(),
            pool_ttl_secs: SharedPoolStorage::DEFAULT_TTL.as_secs(),
        }
    }
}

impl From<OptionalContainerConfig> for ContainerConfig {
    fn from(value: OptionalContainerConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            auto_register_types: value
                .auto_register_types
                .unwrap_or(default.auto_register_types),
            pool_storage: value.pool_storage.unwrap_or(default.pool_storage),
            pool_ttl_secs: value
                .pool_ttl_secs
                .filter(|ttl| *ttl > 0)
                .unwrap_or(default.pool_ttl_secs),
        }
    }
}

impl ContainerConfig {
    /// Loads the config from [CONFIG_FILE] and the environment.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(Self::from_config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config
            .try_deserialize::<OptionalContainerConfig>()
            .map(|config| config.into())
    }

    #[inline]
    pub fn pool_ttl(&self) -> Duration {
        Duration::from_secs(self.pool_ttl_secs)
    }
}

#[derive(Deserialize)]
struct OptionalContainerConfig {
    install_tracing_logger: Option<bool>,
    auto_register_types: Option<bool>,
    pool_storage: Option<PoolStorageKind>,
    pool_ttl_secs: Option<u64>,
}
