//! Types constructible by the container are described by statically declared descriptors, rather
//! than discovered at runtime. A descriptor lists constructor parameters in declaration order (each
//! with an optional dependency type and an optional default value), knows how to construct the type
//! from [BoundArguments] and lists methods available for setter injection.
//!
//! ## Declaring constructible types
//!
//! Any type which wants to be constructed by the container needs to implement [Constructible]. For
//! convenience, the trait can be automatically derived if the `derive` feature is enabled. Every
//! field becomes a constructor parameter:
//!
//! ```
//! # #[cfg(feature = "derive")]
//! # mod example {
//! use wireup_di::instance::InstancePtr;
//! use wireup_di::Constructible;
//!
//! #[derive(Constructible)]
//! struct Connection;
//!
//! #[derive(Constructible)]
//! #[constructible(name = "repository")]
//! struct Repository {
//!     // dependency on the type registered as "Connection"
//!     connection: InstancePtr<Connection>,
//!     // optional dependency - null when not resolvable
//!     #[constructible(optional)]
//!     fallback: Option<InstancePtr<Connection>>,
//!     // plain value without a default - must be supplied explicitly
//!     #[constructible(value)]
//!     table: String,
//!     #[constructible(default)]
//!     retries: i64,
//!     #[constructible(default = "default_timeout")]
//!     timeout: i64,
//! }
//!
//! fn default_timeout() -> i64 {
//!     30
//! }
//! # }
//! ```
//!
//! ### Supported `#[constructible]` struct configuration
//!
//! * `name = "name"` - register the type under given name instead of the struct identifier
//! * `methods = "expr"` - call `expr()` to get the list of [MethodDescriptor]s available for setter
//! injection
//!
//! ### Supported `#[constructible]` field configuration
//!
//! * `value` - plain parameter without a dependency type
//! * `default` - use `Default::default()` as the declared default
//! * `default = "expr"` - call `expr()` to get the declared default
//! * `dependency = "alias"` - resolve given alias instead of the type inferred from the field
//! * `optional` - declare a null default, so unresolvable dependencies become `None`
//!
//! Types registered in a [TypeRegistry] can be requested from the
//! [Container](crate::container::Container) by name, even without an explicit definition.

use crate::arguments::BoundArguments;
use crate::error::ArgumentError;
use crate::instance::{convert_error, ErrorPtr, Injectable, InstancePtr, OwnedInstance};
use crate::value::Value;
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::{type_name, Any, TypeId};
use tracing::warn;

/// Description of a single formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Name of the type (or alias) which can be resolved to provide the value.
    pub dependency: Option<String>,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            dependency: None,
            default: None,
        }
    }

    pub fn with_dependency<D: Into<String>>(mut self, dependency: D) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    pub fn with_default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered, shareable parameter descriptions.
pub type ParameterList = InstancePtr<[Parameter]>;

/// Base trait for types constructible by the container. Please see the module-level documentation
/// for more information.
pub trait Constructible: Injectable + Sized {
    /// Name under which the type is known to the container.
    const NAME: &'static str;

    /// Constructor parameters in declaration order.
    fn parameters() -> Vec<Parameter>;

    /// Creates an instance from arguments bound to [Constructible::parameters].
    fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr>;

    /// Methods available for setter injection.
    fn methods() -> Vec<MethodDescriptor> {
        Vec::new()
    }
}

/// Helper trait for field types which are injected dependencies. Used by the derive macro to infer
/// dependency type names.
pub trait Injected {
    fn dependency_name() -> &'static str;
}

impl<T: Constructible> Injected for InstancePtr<T> {
    #[inline]
    fn dependency_name() -> &'static str {
        T::NAME
    }
}

impl<T: Injected> Injected for Option<T> {
    #[inline]
    fn dependency_name() -> &'static str {
        T::dependency_name()
    }
}

pub type ConstructFn = fn(arguments: &mut BoundArguments) -> Result<OwnedInstance, ErrorPtr>;

pub type MethodFn = InstancePtr<
    dyn Fn(&mut dyn Any, &mut BoundArguments) -> Result<Value, ErrorPtr> + Send + Sync,
>;

/// Description of a method which can be invoked on constructed instances.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct MethodDescriptor {
    name: String,
    parameters: Vec<Parameter>,
    #[derivative(Debug = "ignore")]
    invoke: MethodFn,
}

impl MethodDescriptor {
    pub fn new<T: Injectable, N: Into<String>>(
        name: N,
        parameters: Vec<Parameter>,
        method: fn(&mut T, &mut BoundArguments) -> Result<Value, ErrorPtr>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            invoke: InstancePtr::new(
                move |target: &mut dyn Any, arguments: &mut BoundArguments| {
                    let target = target.downcast_mut::<T>().ok_or_else(|| {
                        convert_error(ArgumentError::IncompatibleTarget(
                            type_name::<T>().to_string(),
                        ))
                    })?;
                    method(target, arguments)
                },
            ) as MethodFn,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Calls the method on given target, which must be of the type the method was declared for.
    pub fn invoke(
        &self,
        target: &mut dyn Any,
        arguments: &mut BoundArguments,
    ) -> Result<Value, ErrorPtr> {
        (self.invoke)(target, arguments)
    }
}

fn construct_erased<T: Constructible>(
    arguments: &mut BoundArguments,
) -> Result<OwnedInstance, ErrorPtr> {
    T::construct(arguments).map(|instance| Box::new(instance) as OwnedInstance)
}

/// Type-erased description of a [Constructible] type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    #[derivative(Debug = "ignore")]
    parameters: fn() -> Vec<Parameter>,
    #[derivative(Debug = "ignore")]
    construct: ConstructFn,
    methods: FxHashMap<String, MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn of<T: Constructible>() -> Self {
        Self {
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            parameters: T::parameters,
            construct: construct_erased::<T>,
            methods: T::methods()
                .into_iter()
                .map(|method| (method.name.clone(), method))
                .collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns freshly declared constructor parameters.
    #[inline]
    pub fn parameters(&self) -> Vec<Parameter> {
        (self.parameters)()
    }

    #[inline]
    pub fn construct(&self, arguments: &mut BoundArguments) -> Result<OwnedInstance, ErrorPtr> {
        (self.construct)(arguments)
    }

    #[inline]
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// Method names in alphabetical order.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).sorted().collect()
    }
}

/// Registry of known constructible types - the universe of names the container can build without
/// an explicit implementation.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry containing all types with derived [Constructible].
    pub fn from_static() -> Self {
        let mut registry = Self::new();
        for descriptor in inventory::iter::<internal::TypeRegistrar>
            .into_iter()
            .map(|registrar| (registrar.register)())
        {
            registry.register(descriptor);
        }

        registry
    }

    /// Adds a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        if let Some(previous) = self.types.get(descriptor.name) {
            if previous.type_id != descriptor.type_id {
                warn!(
                    name = descriptor.name,
                    "Replacing constructible type descriptor with a different type."
                );
            }
        }

        self.types.insert(descriptor.name.to_string(), descriptor);
    }

    #[inline]
    pub fn register_type<T: Constructible>(&mut self) {
        self.register(TypeDescriptor::of::<T>());
    }

    /// Builder-style version of [TypeRegistry::register_type].
    pub fn with_type<T: Constructible>(mut self) -> Self {
        self.register_type::<T>();
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[doc(hidden)]
pub mod internal {
    use crate::descriptor::TypeDescriptor;
    use inventory::collect;
    pub use inventory::submit;

    pub struct TypeRegistrar {
        pub register: fn() -> TypeDescriptor,
    }

    collect!(TypeRegistrar);
}
