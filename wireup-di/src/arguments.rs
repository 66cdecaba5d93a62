//! Explicit argument sets supplied by definitions and callers, and the [BoundArguments] produced by
//! binding them against declared parameters.
//!
//! [Arguments] can address parameters by name, by position or both. Named entries take precedence
//! over positional ones, while a `None` positional entry leaves the parameter to its declared
//! dependency or default:
//!
//! ```
//! use wireup_di::arguments::Arguments;
//! use wireup_di::value::Value;
//!
//! let arguments = Arguments::positional([None, Some(Value::Int(21))]).with("id", 5);
//! assert_eq!(arguments.lookup("id", 1), Some(&Value::Int(5)));
//! assert_eq!(arguments.lookup("other", 1), Some(&Value::Int(21)));
//! assert_eq!(arguments.lookup("other", 0), None);
//! ```

use crate::error::ArgumentError;
use crate::instance::{convert_error, ErrorPtr, FactoryPtr};
use crate::value::{FromValue, Value};
use fxhash::FxHashMap;
use std::any::type_name;

/// Explicit arguments, addressed by parameter name and/or position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    named: FxHashMap<String, Value>,
    positional: Vec<Option<Value>>,
}

impl Arguments {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates positional arguments, where `None` means "use what the parameter declares".
    pub fn positional<I: IntoIterator<Item = Option<Value>>>(values: I) -> Self {
        Self {
            named: Default::default(),
            positional: values.into_iter().collect(),
        }
    }

    /// Adds a named argument, returning the modified set.
    pub fn with<N: Into<String>, V: Into<Value>>(mut self, name: N, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a positional argument, returning the modified set.
    pub fn with_position<V: Into<Value>>(mut self, position: usize, value: V) -> Self {
        if self.positional.len() <= position {
            self.positional.resize(position + 1, None);
        }

        self.positional[position] = Some(value.into());
        self
    }

    /// Upserts a named argument, returning the previous value.
    pub fn insert<N: Into<String>, V: Into<Value>>(&mut self, name: N, value: V) -> Option<Value> {
        self.named.insert(name.into(), value.into())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    #[inline]
    pub fn position(&self, position: usize) -> Option<&Value> {
        self.positional.get(position).and_then(Option::as_ref)
    }

    /// Finds the explicit value for a parameter: by name first, then by position.
    pub fn lookup(&self, name: &str, position: usize) -> Option<&Value> {
        self.get(name).or_else(|| self.position(position))
    }

    /// Returns a new set, where entries from `overrides` replace the ones in `self`. Empty
    /// positional overrides don't replace anything.
    pub fn merged(&self, overrides: &Arguments) -> Arguments {
        let mut result = self.clone();
        result.named.extend(
            overrides
                .named
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        for (position, value) in overrides.positional.iter().enumerate() {
            if let Some(value) = value {
                result = result.with_position(position, value.clone());
            }
        }

        result
    }

    /// Iterates over named arguments in arbitrary order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.iter().all(Option::is_none)
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            named: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            positional: Default::default(),
        }
    }
}

/// Arguments bound to declared parameters, in declaration order. A parameter without any value is
/// left unbound and fails only when consumed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundArguments {
    values: Vec<(String, Option<Value>)>,
}

impl BoundArguments {
    pub fn new(values: Vec<(String, Option<Value>)>) -> Self {
        Self { values }
    }

    /// Returns the bound value for a parameter, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(parameter, _)| parameter == name)
            .and_then(|(_, value)| value.as_ref())
    }

    #[inline]
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Moves the value out of a parameter and converts it. Fails if the parameter is unbound or has
    /// an incompatible value.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, ErrorPtr> {
        let value = self
            .values
            .iter_mut()
            .find(|(parameter, _)| parameter == name)
            .and_then(|(_, value)| value.take())
            .ok_or_else(|| convert_error(ArgumentError::Unbound(name.to_string())))?;

        T::from_value(value).map_err(|value| {
            convert_error(ArgumentError::Incompatible {
                parameter: name.to_string(),
                expected: type_name::<T>().to_string(),
                actual: value.kind().to_string(),
            })
        })
    }

    /// Like [BoundArguments::take], but an unbound parameter or a null value yield `None`.
    pub fn optional<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, ErrorPtr> {
        if self.is_bound(name) {
            self.take::<Option<T>>(name)
        } else {
            Ok(None)
        }
    }

    /// Takes a callable argument.
    pub fn callable(&mut self, name: &str) -> Result<FactoryPtr, ErrorPtr> {
        match self.take::<Value>(name)? {
            Value::Callable(callable) => Ok(callable),
            value => Err(convert_error(ArgumentError::Incompatible {
                parameter: name.to_string(),
                expected: "callable".to_string(),
                actual: value.kind().to_string(),
            })),
        }
    }
}
