//! Core functionality for registering definitions and resolving instances.
//!
//! The [Container] owns the alias -> [Definition] registry and the singleton cache, and delegates
//! describing and constructing types to a [Resolver]. Aliases without a definition are still
//! resolvable when they name a known [Constructible] type - a default singleton definition gets
//! registered for them on first use.
//!
//! ```
//! use wireup_di::arguments::BoundArguments;
//! use wireup_di::container::ContainerBuilder;
//! use wireup_di::descriptor::{Constructible, Parameter};
//! use wireup_di::instance::ErrorPtr;
//! use wireup_di::value::Value;
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! impl Constructible for Greeter {
//!     const NAME: &'static str = "Greeter";
//!
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::new("greeting").with_default("Hello")]
//!     }
//!
//!     fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
//!         Ok(Self {
//!             greeting: arguments.take("greeting")?,
//!         })
//!     }
//! }
//!
//! let mut container = ContainerBuilder::new().with_type::<Greeter>().build();
//! container
//!     .set_implementation("polite", "Greeter")
//!     .with_argument("greeting", "Good morning");
//!
//! let polite = container.get("polite").unwrap();
//! assert_eq!(polite.downcast::<Greeter>().unwrap().greeting, "Good morning");
//! assert_eq!(container.get("polite").unwrap(), polite);
//!
//! // the implementing type shares the singleton
//! assert_eq!(container.get_type::<Greeter>().unwrap().greeting, "Good morning");
//! ```

use crate::arguments::Arguments;
use crate::callable::Callable;
use crate::definition::{Definition, Implementation};
use crate::descriptor::{Constructible, TypeRegistry};
use crate::error::ContainerError;
use crate::instance::{
    ErrorPtr, FactoryPtr, InstancePtr, InstanceProvider, TypedInstanceProvider,
};
use crate::pool_storage::{ArrayPoolStorage, PoolStoragePtr};
use crate::resolver::Resolver;
use crate::value::Value;
use fxhash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

/// Registers definitions in a container, usually during application bootstrap.
pub trait ServiceRegisterer {
    fn register(&self, container: &mut Container);
}

/// Builder for [Container] with sensible defaults, for easy construction.
pub struct ContainerBuilder {
    types: TypeRegistry,
    storage: PoolStoragePtr,
    auto_register: bool,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Creates a new builder with all statically declared types, an in-memory pool storage and
    /// auto-registration enabled.
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::from_static(),
            storage: InstancePtr::new(ArrayPoolStorage::new()) as PoolStoragePtr,
            auto_register: true,
        }
    }

    /// Sets new [TypeRegistry].
    pub fn with_type_registry(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Adds a constructible type to the current registry.
    pub fn with_type<T: Constructible>(mut self) -> Self {
        self.types.register_type::<T>();
        self
    }

    /// Sets new [PoolStorage](crate::pool_storage::PoolStorage).
    pub fn with_pool_storage(mut self, storage: PoolStoragePtr) -> Self {
        self.storage = storage;
        self
    }

    /// Enables or disables implicit definitions for constructible types.
    pub fn with_auto_registration(mut self, auto_register: bool) -> Self {
        self.auto_register = auto_register;
        self
    }

    /// Builds resulting [Container].
    pub fn build(self) -> Container {
        Container::new(
            Resolver::new(self.storage, InstancePtr::new(self.types)),
            self.auto_register,
        )
    }
}

/// Stack of aliases being resolved by a single top-level request.
#[derive(Clone, Debug, Default)]
struct ResolutionChain {
    stack: Vec<String>,
}

impl ResolutionChain {
    fn enter(&mut self, alias: &str) -> Result<(), ContainerError> {
        if self.stack.iter().any(|entry| entry == alias) {
            let mut chain = self.stack.clone();
            chain.push(alias.to_string());

            return Err(ContainerError::CyclicDependency {
                alias: alias.to_string(),
                chain,
            });
        }

        self.stack.push(alias.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

/// Provider used for nested resolution, so dependencies share the chain of their dependant.
struct ChainedProvider<'a> {
    container: &'a mut Container,
    chain: &'a mut ResolutionChain,
}

impl InstanceProvider for ChainedProvider<'_> {
    fn instance(&mut self, alias: &str) -> Result<Value, ContainerError> {
        self.container.get_chained(alias, self.chain)
    }
}

/// Alias-based registry of definitions and cache of singleton instances.
pub struct Container {
    resolver: Resolver,
    definitions: FxHashMap<String, Definition>,
    instances: FxHashMap<String, Value>,
    // aliases registered on first use, which never shadow explicit configuration
    implicit: FxHashSet<String>,
    pending_arguments: Option<Arguments>,
    auto_register: bool,
}

impl Default for Container {
    fn default() -> Self {
        ContainerBuilder::new().build()
    }
}

impl Container {
    /// Creates an empty container. When `auto_register` is set, aliases naming constructible types
    /// resolve without explicit definitions.
    pub fn new(resolver: Resolver, auto_register: bool) -> Self {
        Self {
            resolver,
            definitions: Default::default(),
            instances: Default::default(),
            implicit: Default::default(),
            pending_arguments: None,
            auto_register,
        }
    }

    #[inline]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Registers a definition implemented by the alias itself.
    pub fn set<A: Into<String>>(&mut self, alias: A) -> &mut Definition {
        let alias = alias.into();
        self.insert(Definition::new(alias.clone(), alias))
    }

    /// Registers a definition with given implementation.
    pub fn set_implementation<A: Into<String>, I: Into<Implementation>>(
        &mut self,
        alias: A,
        implementation: I,
    ) -> &mut Definition {
        self.insert(Definition::new(alias, implementation))
    }

    /// Registers a definition, replacing any previous one for the same alias. The cached singleton
    /// for the alias is dropped.
    pub fn insert(&mut self, definition: Definition) -> &mut Definition {
        let alias = definition.alias().to_string();
        self.instances.remove(&alias);
        self.implicit.remove(&alias);

        match self.definitions.entry(alias) {
            Entry::Occupied(mut entry) => {
                debug!(alias = entry.key().as_str(), "Replacing definition.");
                entry.insert(definition);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(definition),
        }
    }

    /// Checks if a definition is registered for given alias.
    #[inline]
    pub fn has(&self, alias: &str) -> bool {
        self.definitions.contains_key(alias)
    }

    #[inline]
    pub fn definition(&self, alias: &str) -> Option<&Definition> {
        self.definitions.get(alias)
    }

    /// Gives mutable access to a registered definition, which then counts as explicitly registered.
    /// Singletons which are already cached are not affected.
    #[inline]
    pub fn definition_mut(&mut self, alias: &str) -> Option<&mut Definition> {
        self.implicit.remove(alias);
        self.definitions.get_mut(alias)
    }

    /// Returns all registered aliases in arbitrary order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Sets arguments overriding definition arguments for the next instantiation only. Instances
    /// created with overrides are never cached as singletons, and a cached singleton hit leaves the
    /// arguments pending.
    pub fn set_args(&mut self, arguments: Arguments) -> &mut Self {
        self.pending_arguments = Some(arguments);
        self
    }

    /// Runs given registerer against this container.
    pub fn register(&mut self, registerer: &dyn ServiceRegisterer) -> &mut Self {
        registerer.register(self);
        self
    }

    /// Returns the value for given alias, creating it when needed.
    pub fn get(&mut self, alias: &str) -> Result<Value, ContainerError> {
        let mut chain = ResolutionChain::default();
        self.get_chained(alias, &mut chain)
    }

    /// Typesafe lookup of a constructible type by its name.
    pub fn get_type<T: Constructible>(&mut self) -> Result<InstancePtr<T>, ContainerError> {
        self.instance_typed(T::NAME)
    }

    fn get_chained(
        &mut self,
        alias: &str,
        chain: &mut ResolutionChain,
    ) -> Result<Value, ContainerError> {
        chain.enter(alias)?;
        let result = self.lookup(alias, chain);
        chain.leave();

        result
    }

    fn lookup(&mut self, alias: &str, chain: &mut ResolutionChain) -> Result<Value, ContainerError> {
        if let Some(instance) = self.instances.get(alias) {
            return Ok(instance.clone());
        }

        let definition = match self.definitions.get(alias) {
            Some(definition) => definition.clone(),
            None if self.auto_register && self.resolver.is_constructible(alias) => {
                debug!(alias, "Registering definition for constructible type.");

                let definition = Definition::new(alias, alias);
                self.definitions
                    .insert(alias.to_string(), definition.clone());
                self.implicit.insert(alias.to_string());
                definition
            }
            None => return Err(ContainerError::DependencyNotFound(alias.to_string())),
        };

        let has_overrides = self.pending_arguments.is_some();
        let value = self.resolve(&definition, chain)?;

        if has_overrides && self.pending_arguments.is_none() {
            trace!(alias, "Skipping singleton cache for overridden instance.");
        } else if definition.is_singleton() {
            self.store_singleton(&definition, value.clone());
        }

        Ok(value)
    }

    fn store_singleton(&mut self, definition: &Definition, value: Value) {
        let alias = definition.alias();
        trace!(alias, "Caching singleton instance.");

        if let Some(name) = definition.implementation().name() {
            if name != alias
                && self
                    .definitions
                    .get(name)
                    .map_or(true, Definition::is_singleton)
            {
                self.instances
                    .entry(name.to_string())
                    .or_insert_with(|| value.clone());
            }
        }

        self.instances.insert(alias.to_string(), value);
    }

    fn resolve(
        &mut self,
        definition: &Definition,
        chain: &mut ResolutionChain,
    ) -> Result<Value, ContainerError> {
        let alias = definition.alias();
        match definition.implementation() {
            Implementation::Type(name)
                if name != alias
                    && self.definitions.contains_key(name)
                    && !self.implicit.contains(name) =>
            {
                self.get_chained(name, chain)
            }
            Implementation::Type(name) if self.resolver.is_constructible(name) => {
                self.instantiate(name, definition, chain)
            }
            Implementation::Alias(name) => self.get_chained(name, chain),
            Implementation::Instance(value) => Ok(value.clone()),
            Implementation::Factory(factory) => {
                factory().map_err(|error| ContainerError::Factory {
                    alias: alias.to_string(),
                    error,
                })
            }
            implementation => Err(ContainerError::Unresolvable {
                alias: alias.to_string(),
                implementation: implementation.describe(),
            }),
        }
    }

    fn instantiate(
        &mut self,
        type_name: &str,
        definition: &Definition,
        chain: &mut ResolutionChain,
    ) -> Result<Value, ContainerError> {
        let overrides = self.pending_arguments.take();
        let resolver = self.resolver.clone();

        let mut provider = ChainedProvider {
            container: self,
            chain,
        };
        resolver.instantiate(type_name, Some(definition), overrides.as_ref(), &mut provider)
    }

    /// Wraps a callable in an implementation, which resolves to the callable itself rather than to
    /// its result.
    #[cfg(feature = "threadsafe")]
    pub fn raw<F>(callable: F) -> Implementation
    where
        F: Fn() -> Result<Value, ErrorPtr> + Send + Sync + 'static,
    {
        let callable = InstancePtr::new(callable) as FactoryPtr;
        Implementation::factory(move || Ok(Value::Callable(callable.clone())))
    }

    /// Wraps a callable in an implementation, which resolves to the callable itself rather than to
    /// its result.
    #[cfg(not(feature = "threadsafe"))]
    pub fn raw<F>(callable: F) -> Implementation
    where
        F: Fn() -> Result<Value, ErrorPtr> + 'static,
    {
        let callable = InstancePtr::new(callable) as FactoryPtr;
        Implementation::factory(move || Ok(Value::Callable(callable.clone())))
    }

    /// Applies setters registered for given alias to an instance created outside the container.
    pub fn inject_setters<T: Constructible>(
        &mut self,
        alias: &str,
        instance: &mut T,
    ) -> Result<(), ContainerError> {
        let definition = self
            .definitions
            .get(alias)
            .cloned()
            .ok_or_else(|| ContainerError::DependencyNotFound(alias.to_string()))?;
        let resolver = self.resolver.clone();

        let mut chain = ResolutionChain::default();
        let mut provider = ChainedProvider {
            container: self,
            chain: &mut chain,
        };
        resolver.apply_setters(&definition, T::NAME, instance, &mut provider)
    }

    /// Creates a thunk which binds arguments to the callable and invokes it. Parameter lists of
    /// functions are cached under `key`. Each invocation resolves dependencies with its own
    /// resolution chain.
    pub fn executable_from_callable(
        &mut self,
        key: &str,
        mut callable: Callable,
        arguments: Arguments,
    ) -> impl FnMut() -> Result<Value, ContainerError> + '_ {
        let key = key.to_string();
        let resolver = self.resolver.clone();

        move || {
            let mut chain = ResolutionChain::default();
            let mut provider = ChainedProvider {
                container: &mut *self,
                chain: &mut chain,
            };
            resolver.invoke(&key, &mut callable, &arguments, &mut provider)
        }
    }
}

impl InstanceProvider for Container {
    #[inline]
    fn instance(&mut self, alias: &str) -> Result<Value, ContainerError> {
        self.get(alias)
    }
}
