//! Recipes describing how to build the value registered under an alias.
//!
//! A [Definition] is pure data - it has no behavior beyond accessors and chainable builders. All
//! builders mutate in place and return the same definition, so registration reads fluently:
//!
//! ```
//! use wireup_di::arguments::Arguments;
//! use wireup_di::definition::Definition;
//! use wireup_di::value::Value;
//!
//! let mut definition = Definition::new("mailer", "SmtpMailer");
//! definition
//!     .with_argument("host", "localhost")
//!     .with_argument("logger", Value::reference("logger"))
//!     .with_setter("add_header", Arguments::new().with("name", "X-Mailer"))
//!     .set_singleton(false);
//!
//! assert_eq!(definition.alias(), "mailer");
//! assert!(!definition.is_singleton());
//! assert_eq!(definition.setter("add_header").len(), 1);
//! ```

use crate::arguments::Arguments;
use crate::instance::{ErrorPtr, FactoryPtr, InstancePtr};
use crate::value::Value;
use std::fmt::{Debug, Formatter};

/// What a [Definition] resolves to.
#[derive(Clone)]
pub enum Implementation {
    /// Name of a constructible type or of another registered alias.
    Type(String),
    /// Explicit delegation to another alias.
    Alias(String),
    /// Pre-built value, returned as-is.
    Instance(Value),
    /// Zero-argument factory, invoked on resolution.
    Factory(FactoryPtr),
}

impl Implementation {
    pub fn alias<A: Into<String>>(alias: A) -> Self {
        Implementation::Alias(alias.into())
    }

    pub fn instance<V: Into<Value>>(value: V) -> Self {
        Implementation::Instance(value.into())
    }

    #[cfg(feature = "threadsafe")]
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Value, ErrorPtr> + Send + Sync + 'static,
    {
        Implementation::Factory(InstancePtr::new(factory) as FactoryPtr)
    }

    #[cfg(not(feature = "threadsafe"))]
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Value, ErrorPtr> + 'static,
    {
        Implementation::Factory(InstancePtr::new(factory) as FactoryPtr)
    }

    /// Returns the referenced type or alias name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Implementation::Type(name) | Implementation::Alias(name) => Some(name),
            _ => None,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Implementation::Type(name) => format!("type '{name}'"),
            Implementation::Alias(name) => format!("alias '{name}'"),
            Implementation::Instance(value) => format!("{} instance", value.kind()),
            Implementation::Factory(_) => "factory".to_string(),
        }
    }
}

impl Debug for Implementation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Implementation::Type(name) => f.debug_tuple("Type").field(name).finish(),
            Implementation::Alias(name) => f.debug_tuple("Alias").field(name).finish(),
            Implementation::Instance(value) => f.debug_tuple("Instance").field(value).finish(),
            Implementation::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<&str> for Implementation {
    fn from(name: &str) -> Self {
        Implementation::Type(name.to_string())
    }
}

impl From<String> for Implementation {
    fn from(name: String) -> Self {
        Implementation::Type(name)
    }
}

/// Ordered call records for a single setter method.
#[derive(Clone, Debug, PartialEq)]
pub struct Setter {
    pub method: String,
    pub calls: Vec<Arguments>,
}

#[derive(Clone, Debug)]
pub struct Definition {
    alias: String,
    implementation: Implementation,
    singleton: bool,
    arguments: Arguments,
    setters: Vec<Setter>,
}

impl Definition {
    /// Creates a singleton definition without arguments or setters.
    pub fn new<A: Into<String>, I: Into<Implementation>>(alias: A, implementation: I) -> Self {
        Self {
            alias: alias.into(),
            implementation: implementation.into(),
            singleton: true,
            arguments: Default::default(),
            setters: Default::default(),
        }
    }

    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    #[inline]
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn set_singleton(&mut self, singleton: bool) -> &mut Self {
        self.singleton = singleton;
        self
    }

    #[inline]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Returns the explicit argument for given parameter. `None` means no argument was given,
    /// which is different from `Some(Value::Null)`.
    #[inline]
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn with_argument<N: Into<String>, V: Into<Value>>(&mut self, name: N, value: V) -> &mut Self {
        self.arguments.insert(name, value);
        self
    }

    pub fn with_arguments<N, V, I>(&mut self, arguments: I) -> &mut Self
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        for (name, value) in arguments {
            self.arguments.insert(name, value);
        }

        self
    }

    /// Sets positional constructor arguments. Named arguments take precedence.
    pub fn with_positional_arguments<I: IntoIterator<Item = Option<Value>>>(
        &mut self,
        arguments: I,
    ) -> &mut Self {
        for (position, value) in arguments.into_iter().enumerate() {
            if let Some(value) = value {
                self.arguments = std::mem::take(&mut self.arguments).with_position(position, value);
            }
        }

        self
    }

    /// Appends a call record for given method. Previous calls are never replaced.
    pub fn with_setter<M: Into<String>>(&mut self, method: M, arguments: Arguments) -> &mut Self {
        let method = method.into();
        match self.setters.iter_mut().find(|setter| setter.method == method) {
            Some(setter) => setter.calls.push(arguments),
            None => self.setters.push(Setter {
                method,
                calls: vec![arguments],
            }),
        }

        self
    }

    /// Returns call records for given method, in registration order.
    pub fn setter(&self, method: &str) -> &[Arguments] {
        self.setters
            .iter()
            .find(|setter| setter.method == method)
            .map(|setter| setter.calls.as_slice())
            .unwrap_or_default()
    }

    /// Returns all setters, in order of first registration.
    #[inline]
    pub fn setters(&self) -> &[Setter] {
        &self.setters
    }
}
