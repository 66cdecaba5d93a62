//! Dynamically typed values, which flow through argument binding, factories and the singleton
//! cache.
//!
//! Most values are plain data, but two variants carry shared pointers: [Value::Instance] for
//! managed objects and [Value::Callable] for callables passed around as data. Strings starting
//! with [REFERENCE_SIGIL] have a special meaning when used as explicit arguments - they are
//! references to other aliases:
//!
//! ```
//! use wireup_di::value::Value;
//!
//! let reference = Value::reference("logger");
//! assert_eq!(reference.as_reference(), Some("logger"));
//! assert_eq!(Value::from("logger").as_reference(), None);
//! ```

use crate::instance::{ErrorPtr, FactoryPtr, InstanceAnyPtr, InstancePtr, Injectable};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Leading character marking a string argument as a reference to another alias.
pub const REFERENCE_SIGIL: char = '@';

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Instance(InstanceAnyPtr),
    Callable(FactoryPtr),
}

impl Value {
    /// Creates a reference marker for given alias.
    pub fn reference<A: AsRef<str>>(alias: A) -> Self {
        Value::Str(format!("{}{}", REFERENCE_SIGIL, alias.as_ref()))
    }

    /// Wraps a value in a new shared instance pointer.
    pub fn instance<T: Injectable>(instance: T) -> Self {
        Value::Instance(InstancePtr::new(instance) as InstanceAnyPtr)
    }

    /// Wraps an already shared instance.
    pub fn from_ptr<T: Injectable>(instance: InstancePtr<T>) -> Self {
        Value::Instance(instance as InstanceAnyPtr)
    }

    /// Wraps a callable, so it can be passed around as data.
    #[cfg(feature = "threadsafe")]
    pub fn callable<F>(callable: F) -> Self
    where
        F: Fn() -> Result<Value, ErrorPtr> + Send + Sync + 'static,
    {
        Value::Callable(InstancePtr::new(callable) as FactoryPtr)
    }

    /// Wraps a callable, so it can be passed around as data.
    #[cfg(not(feature = "threadsafe"))]
    pub fn callable<F>(callable: F) -> Self
    where
        F: Fn() -> Result<Value, ErrorPtr> + 'static,
    {
        Value::Callable(InstancePtr::new(callable) as FactoryPtr)
    }

    /// Returns the referenced alias, if this value is a reference marker.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Str(value) => value.strip_prefix(REFERENCE_SIGIL),
            _ => None,
        }
    }

    /// Tries to view the contained instance as a concrete type.
    pub fn downcast<T: Injectable>(&self) -> Option<InstancePtr<T>> {
        match self {
            Value::Instance(instance) => instance.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Instance(_) => "instance",
            Value::Callable(_) => "callable",
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Value::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Value::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Value::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Value::List(value) => f.debug_tuple("List").field(value).finish(),
            Value::Map(value) => f.debug_tuple("Map").field(value).finish(),
            Value::Instance(_) => f.write_str("Instance(..)"),
            Value::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Instances and callables compare by identity, everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => InstancePtr::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => InstancePtr::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// unsigned values above i64::MAX saturate
macro_rules! integer_into_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

integer_into_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(value: BTreeMap<String, T>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Conversion from a bound [Value] into a concrete argument type. On mismatch, the original value
/// is given back.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(value) => Ok(value),
            value => Err(value),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(int) => <$ty>::try_from(int).map_err(|_| Value::Int(int)),
                        value => Err(value),
                    }
                }
            }
        )*
    };
}

integer_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(value) => Ok(value),
            Value::Int(value) => Ok(value as f64),
            value => Err(value),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(value) => Ok(value as f32),
            Value::Int(value) => Ok(value as f32),
            value => Err(value),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(value) => Ok(value),
            value => Err(value),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => {
                if items.iter().all(|item| T::from_value(item.clone()).is_ok()) {
                    items.into_iter().map(T::from_value).collect()
                } else {
                    Err(Value::List(items))
                }
            }
            value => Err(value),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Map(entries) => {
                if entries.values().all(|item| T::from_value(item.clone()).is_ok()) {
                    entries
                        .into_iter()
                        .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                        .collect()
                } else {
                    Err(Value::Map(entries))
                }
            }
            value => Err(value),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: Injectable> FromValue for InstancePtr<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Instance(instance) => instance.downcast::<T>().map_err(Value::Instance),
            value => Err(value),
        }
    }
}
