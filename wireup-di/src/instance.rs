//! Pointer types for managed instances and the generic [InstanceProvider] used to request them.

use crate::error::ContainerError;
use crate::value::Value;
#[cfg(test)]
use mockall::automock;
use std::any::Any;
use std::error::Error;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type InstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type InstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type InstanceAnyPtr = InstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

/// A freshly constructed instance, before it gets shared. Setters are applied at this stage.
#[cfg(not(feature = "threadsafe"))]
pub type OwnedInstance = Box<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type OwnedInstance = Box<dyn Any + Send + Sync + 'static>;

#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = InstancePtr<dyn Error + 'static>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = InstancePtr<dyn Error + Send + Sync + 'static>;

/// Marker trait for types which can be managed by the container.
#[cfg(feature = "threadsafe")]
pub trait Injectable: Any + Send + Sync {}

#[cfg(feature = "threadsafe")]
impl<T: Any + Send + Sync> Injectable for T {}

/// Marker trait for types which can be managed by the container.
#[cfg(not(feature = "threadsafe"))]
pub trait Injectable: Any {}

#[cfg(not(feature = "threadsafe"))]
impl<T: Any> Injectable for T {}

/// Zero-argument callable producing a value. Used for factory implementations and callable values.
#[cfg(feature = "threadsafe")]
pub trait FactoryFn: Fn() -> Result<Value, ErrorPtr> + Send + Sync {}

#[cfg(feature = "threadsafe")]
impl<F: Fn() -> Result<Value, ErrorPtr> + Send + Sync> FactoryFn for F {}

/// Zero-argument callable producing a value. Used for factory implementations and callable values.
#[cfg(not(feature = "threadsafe"))]
pub trait FactoryFn: Fn() -> Result<Value, ErrorPtr> {}

#[cfg(not(feature = "threadsafe"))]
impl<F: Fn() -> Result<Value, ErrorPtr>> FactoryFn for F {}

pub type FactoryPtr = InstancePtr<dyn FactoryFn>;

/// Converts any error into a shareable [ErrorPtr].
#[cfg(feature = "threadsafe")]
pub fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

/// Converts any error into a shareable [ErrorPtr].
#[cfg(not(feature = "threadsafe"))]
pub fn convert_error<E: Error + 'static>(error: E) -> ErrorPtr {
    Rc::new(error) as ErrorPtr
}

/// Generic provider for instances registered under aliases.
#[cfg_attr(test, automock)]
pub trait InstanceProvider {
    /// Returns the value registered under given alias, creating it when needed.
    fn instance(&mut self, alias: &str) -> Result<Value, ContainerError>;
}

/// Helper trait for [InstanceProvider] providing strongly-typed access.
pub trait TypedInstanceProvider {
    /// Typesafe version of [InstanceProvider::instance].
    fn instance_typed<T: Injectable>(
        &mut self,
        alias: &str,
    ) -> Result<InstancePtr<T>, ContainerError>;

    /// Tries to get an instance like [TypedInstanceProvider::instance_typed] does, but returns
    /// `None` when nothing is known under the alias.
    fn instance_option<T: Injectable>(
        &mut self,
        alias: &str,
    ) -> Result<Option<InstancePtr<T>>, ContainerError>;
}

impl<P: InstanceProvider + ?Sized> TypedInstanceProvider for P {
    fn instance_typed<T: Injectable>(
        &mut self,
        alias: &str,
    ) -> Result<InstancePtr<T>, ContainerError> {
        self.instance(alias).and_then(|value| {
            value
                .downcast::<T>()
                .ok_or_else(|| ContainerError::IncompatibleInstance(alias.to_string()))
        })
    }

    fn instance_option<T: Injectable>(
        &mut self,
        alias: &str,
    ) -> Result<Option<InstancePtr<T>>, ContainerError> {
        match self.instance_typed(alias) {
            Ok(instance) => Ok(Some(instance)),
            Err(ContainerError::DependencyNotFound(missing)) if missing == alias => Ok(None),
            Err(error) => Err(error),
        }
    }
}
