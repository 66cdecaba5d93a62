//! Describing targets and binding arguments to their parameters.
//!
//! The [Resolver] is stateless apart from its collaborators: a [TypeRegistry] which knows what can
//! be constructed, and a [PoolStorage] memoizing described parameter lists. Every dependency is
//! requested through the [InstanceProvider] passed into each call, so the resolver never holds a
//! reference to the container itself.
//!
//! Binding a parameter uses the first applicable source:
//!
//! 1. An explicit named argument, then an explicit positional one (references get resolved).
//! 2. The declared dependency, resolved through the provider. If the dependency is unknown, the
//!    declared default is used instead, when present.
//! 3. The declared default.
//!
//! Parameters with no source stay unbound and fail only when the target consumes them.

use crate::arguments::{Arguments, BoundArguments};
use crate::callable::{Callable, Function};
use crate::definition::Definition;
use crate::descriptor::{Parameter, ParameterList, TypeDescriptor, TypeRegistry};
use crate::error::ContainerError;
use crate::instance::{InstanceAnyPtr, InstancePtr, InstanceProvider};
use crate::pool_storage::{PoolCategory, PoolStorage, PoolStoragePtr};
use crate::value::Value;
use itertools::Itertools;
use std::any::Any;
use tracing::trace;

#[derive(Clone)]
pub struct Resolver {
    storage: PoolStoragePtr,
    types: InstancePtr<TypeRegistry>,
}

impl Resolver {
    pub fn new(storage: PoolStoragePtr, types: InstancePtr<TypeRegistry>) -> Self {
        Self { storage, types }
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn storage(&self) -> &dyn PoolStorage {
        self.storage.as_ref()
    }

    /// Checks if given name denotes a known constructible type.
    #[inline]
    pub fn is_constructible(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    fn descriptor(&self, type_name: &str) -> Result<&TypeDescriptor, ContainerError> {
        self.types
            .get(type_name)
            .ok_or_else(|| ContainerError::DependencyNotFound(type_name.to_string()))
    }

    /// Returns constructor parameters of given type, in declaration order.
    pub fn constructor_parameters(&self, type_name: &str) -> Result<ParameterList, ContainerError> {
        if let Some(parameters) = self.storage.get(type_name, PoolCategory::Constructor) {
            return Ok(parameters);
        }

        trace!(type_name, "Describing constructor parameters.");

        let parameters: ParameterList = self.descriptor(type_name)?.parameters().into();
        self.storage
            .set(type_name, PoolCategory::Constructor, parameters.clone());

        Ok(parameters)
    }

    /// Returns parameters of a method declared by given type, in declaration order.
    pub fn method_parameters(
        &self,
        type_name: &str,
        method: &str,
    ) -> Result<ParameterList, ContainerError> {
        let key = format!("{type_name}:{method}");
        if let Some(parameters) = self.storage.get(&key, PoolCategory::Method) {
            return Ok(parameters);
        }

        trace!(type_name, method, "Describing method parameters.");

        let parameters: ParameterList = self
            .descriptor(type_name)?
            .method(method)
            .ok_or_else(|| ContainerError::UnknownMethod {
                target: type_name.to_string(),
                method: method.to_string(),
            })?
            .parameters()
            .into();

        self.storage
            .set(&key, PoolCategory::Method, parameters.clone());

        Ok(parameters)
    }

    /// Returns parameters of a function, cached under a caller-chosen call site key.
    pub fn function_parameters(&self, key: &str, function: &Function) -> ParameterList {
        if let Some(parameters) = self.storage.get(key, PoolCategory::Function) {
            return parameters;
        }

        trace!(key, "Describing function parameters.");

        let parameters: ParameterList = function.parameters().into();
        self.storage
            .set(key, PoolCategory::Function, parameters.clone());

        parameters
    }

    /// Resolves reference markers through the provider. Other values pass through unchanged.
    pub fn resolve_argument(
        &self,
        value: &Value,
        provider: &mut dyn InstanceProvider,
    ) -> Result<Value, ContainerError> {
        match value.as_reference() {
            Some(alias) => provider.instance(alias),
            None => Ok(value.clone()),
        }
    }

    fn bind_parameter(
        &self,
        position: usize,
        parameter: &Parameter,
        arguments: &Arguments,
        provider: &mut dyn InstanceProvider,
    ) -> Result<Option<Value>, ContainerError> {
        if let Some(value) = arguments.lookup(&parameter.name, position) {
            return self.resolve_argument(value, provider).map(Some);
        }

        if let Some(dependency) = &parameter.dependency {
            return match provider.instance(dependency) {
                Ok(value) => Ok(Some(value)),
                Err(ContainerError::DependencyNotFound(missing))
                    if &missing == dependency && parameter.has_default() =>
                {
                    Ok(parameter.default.clone())
                }
                Err(error) => Err(error),
            };
        }

        Ok(parameter.default.clone())
    }

    /// Binds explicit arguments, dependencies and defaults to given parameters.
    pub fn bind_arguments(
        &self,
        parameters: &[Parameter],
        arguments: &Arguments,
        provider: &mut dyn InstanceProvider,
    ) -> Result<BoundArguments, ContainerError> {
        parameters
            .iter()
            .enumerate()
            .map(|(position, parameter)| {
                self.bind_parameter(position, parameter, arguments, provider)
                    .map(|value| (parameter.name.clone(), value))
            })
            .try_collect()
            .map(BoundArguments::new)
    }

    /// Creates a new instance of given type. Definition arguments override declared defaults and
    /// dependencies, while `overrides` take precedence over both. Definition setters are applied
    /// before the instance gets shared.
    pub fn instantiate(
        &self,
        type_name: &str,
        definition: Option<&Definition>,
        overrides: Option<&Arguments>,
        provider: &mut dyn InstanceProvider,
    ) -> Result<Value, ContainerError> {
        let descriptor = self.descriptor(type_name)?;
        let parameters = self.constructor_parameters(type_name)?;

        let arguments = match (definition, overrides) {
            (Some(definition), Some(overrides)) => definition.arguments().merged(overrides),
            (Some(definition), None) => definition.arguments().clone(),
            (None, Some(overrides)) => overrides.clone(),
            (None, None) => Arguments::new(),
        };

        let mut bound = self.bind_arguments(&parameters, &arguments, provider)?;
        let mut instance =
            descriptor
                .construct(&mut bound)
                .map_err(|error| ContainerError::Construction {
                    target: type_name.to_string(),
                    error,
                })?;

        if let Some(definition) = definition {
            self.apply_setters(definition, type_name, &mut *instance, provider)?;
        }

        Ok(Value::Instance(InstanceAnyPtr::from(instance)))
    }

    /// Invokes setter methods of a definition on given target, which must be an instance of the
    /// named type. Methods run in order of first registration, each call record in registration
    /// order.
    pub fn apply_setters(
        &self,
        definition: &Definition,
        type_name: &str,
        target: &mut dyn Any,
        provider: &mut dyn InstanceProvider,
    ) -> Result<(), ContainerError> {
        if definition.setters().is_empty() {
            return Ok(());
        }

        let descriptor = self.descriptor(type_name)?;
        for setter in definition.setters() {
            let method =
                descriptor
                    .method(&setter.method)
                    .ok_or_else(|| ContainerError::UnknownMethod {
                        target: type_name.to_string(),
                        method: setter.method.clone(),
                    })?;
            let parameters = self.method_parameters(type_name, &setter.method)?;

            for call in &setter.calls {
                let mut bound = self.bind_arguments(&parameters, call, provider)?;
                method
                    .invoke(target, &mut bound)
                    .map_err(|error| ContainerError::Construction {
                        target: format!("{type_name}::{}", setter.method),
                        error,
                    })?;
            }
        }

        Ok(())
    }

    /// Binds arguments to a callable and invokes it.
    pub fn invoke(
        &self,
        key: &str,
        callable: &mut Callable,
        arguments: &Arguments,
        provider: &mut dyn InstanceProvider,
    ) -> Result<Value, ContainerError> {
        match callable {
            Callable::Method {
                target,
                type_name,
                method,
            } => {
                let descriptor = self.descriptor(type_name)?;
                let method_descriptor =
                    descriptor
                        .method(method)
                        .ok_or_else(|| ContainerError::UnknownMethod {
                            target: type_name.clone(),
                            method: method.clone(),
                        })?;
                let parameters = self.method_parameters(type_name, method)?;

                let mut bound = self.bind_arguments(&parameters, arguments, provider)?;
                method_descriptor
                    .invoke(&mut **target, &mut bound)
                    .map_err(|error| ContainerError::Construction {
                        target: format!("{type_name}::{method}"),
                        error,
                    })
            }
            Callable::Function(function) => {
                let parameters = self.function_parameters(key, function);

                let mut bound = self.bind_arguments(&parameters, arguments, provider)?;
                function
                    .call(&mut bound)
                    .map_err(|error| ContainerError::Construction {
                        target: key.to_string(),
                        error,
                    })
            }
        }
    }
}
