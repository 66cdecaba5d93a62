//! Core application bootstrapping functionality.

use crate::config::{ContainerConfig, PoolStorageKind, CONFIG_ALIAS};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wireup_di::container::{Container, ContainerBuilder, ServiceRegisterer};
use wireup_di::definition::Implementation;
use wireup_di::descriptor::{Constructible, TypeRegistry};
use wireup_di::instance::{convert_error, ErrorPtr, InstancePtr};
use wireup_di::pool_storage::{ArrayPoolStorage, PoolStoragePtr, SharedPoolStorage};
use wireup_di::value::Value;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error loading configuration: {0}")]
    Config(ErrorPtr),
}

pub type ServiceRegistererPtr = Box<dyn ServiceRegisterer>;

/// Main entrypoint for the application. Configures supporting infrastructure and bootstraps a
/// [Container] with all registered services.
pub struct Application {
    config: ContainerConfig,
    types: TypeRegistry,
    registerers: Vec<ServiceRegistererPtr>,
    shared_pool: Option<SharedPoolStorage>,
}

impl Application {
    /// Creates an application using given config and all statically declared types.
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            types: TypeRegistry::from_static(),
            registerers: Vec::new(),
            shared_pool: None,
        }
    }

    /// Creates an application using config loaded from the environment.
    pub fn from_environment() -> Result<Self, ApplicationError> {
        ContainerConfig::init_from_environment()
            .map(Self::new)
            .map_err(|error| ApplicationError::Config(convert_error(error)))
    }

    #[inline]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Sets new [TypeRegistry].
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Adds a constructible type to the current registry.
    pub fn with_type<T: Constructible>(mut self) -> Self {
        self.types.register_type::<T>();
        self
    }

    /// Adds a registerer, which will be run against the container in registration order.
    pub fn with_registerer(mut self, registerer: ServiceRegistererPtr) -> Self {
        self.registerers.push(registerer);
        self
    }

    /// Uses the backend of given storage, when the config asks for a shared pool.
    pub fn with_shared_pool(mut self, pool: &SharedPoolStorage) -> Self {
        self.shared_pool = Some(pool.share());
        self
    }

    fn create_pool_storage(
        config: &ContainerConfig,
        shared_pool: Option<SharedPoolStorage>,
    ) -> PoolStoragePtr {
        match config.pool_storage {
            PoolStorageKind::Array => InstancePtr::new(ArrayPoolStorage::new()) as PoolStoragePtr,
            PoolStorageKind::Shared => InstancePtr::new(
                shared_pool
                    .unwrap_or_default()
                    .with_ttl(config.pool_ttl()),
            ) as PoolStoragePtr,
        }
    }

    fn install_tracing_logger() {
        if let Err(error) = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init()
        {
            debug!(%error, "Tracing logger already installed.");
        }
    }

    /// Creates a container with the config registered under [CONFIG_ALIAS] and all registerers
    /// applied.
    pub fn bootstrap(self) -> Container {
        if self.config.install_tracing_logger {
            Self::install_tracing_logger();
        }

        info!(
            pool_storage = ?self.config.pool_storage,
            "Bootstrapping container..."
        );

        let storage = Self::create_pool_storage(&self.config, self.shared_pool);
        let mut container = ContainerBuilder::new()
            .with_type_registry(self.types)
            .with_pool_storage(storage)
            .with_auto_registration(self.config.auto_register_types)
            .build();

        container.set_implementation(
            CONFIG_ALIAS,
            Implementation::instance(Value::instance(self.config)),
        );

        info!(
            count = self.registerers.len(),
            "Running service registerers..."
        );

        for registerer in &self.registerers {
            container.register(registerer.as_ref());
        }

        container
    }
}
