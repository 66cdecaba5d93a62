//! Targets for [executables](crate::container::Container::executable_from_callable): methods bound
//! to an owned instance, or free-standing functions with declared parameters.

use crate::arguments::BoundArguments;
use crate::descriptor::{Constructible, Parameter};
use crate::instance::{ErrorPtr, InstancePtr, OwnedInstance};
use crate::value::Value;
use derivative::Derivative;

#[cfg(not(feature = "threadsafe"))]
pub type FunctionFn = InstancePtr<dyn Fn(&mut BoundArguments) -> Result<Value, ErrorPtr>>;
#[cfg(feature = "threadsafe")]
pub type FunctionFn =
    InstancePtr<dyn Fn(&mut BoundArguments) -> Result<Value, ErrorPtr> + Send + Sync>;

/// A function with explicitly declared parameters.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Function {
    parameters: Vec<Parameter>,
    #[derivative(Debug = "ignore")]
    body: FunctionFn,
}

impl Function {
    #[cfg(feature = "threadsafe")]
    pub fn new<F>(parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(&mut BoundArguments) -> Result<Value, ErrorPtr> + Send + Sync + 'static,
    {
        Self {
            parameters,
            body: InstancePtr::new(body) as FunctionFn,
        }
    }

    #[cfg(not(feature = "threadsafe"))]
    pub fn new<F>(parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(&mut BoundArguments) -> Result<Value, ErrorPtr> + 'static,
    {
        Self {
            parameters,
            body: InstancePtr::new(body) as FunctionFn,
        }
    }

    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub fn call(&self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
        (self.body)(arguments)
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub enum Callable {
    /// Method declared by a [Constructible] type, invoked on an owned target.
    Method {
        #[derivative(Debug = "ignore")]
        target: OwnedInstance,
        type_name: String,
        method: String,
    },
    Function(Function),
}

impl Callable {
    pub fn method<T: Constructible, M: Into<String>>(target: T, method: M) -> Self {
        Callable::Method {
            target: Box::new(target),
            type_name: T::NAME.to_string(),
            method: method.into(),
        }
    }

    #[inline]
    pub fn function(function: Function) -> Self {
        Callable::Function(function)
    }
}

impl From<Function> for Callable {
    fn from(function: Function) -> Self {
        Callable::Function(function)
    }
}
