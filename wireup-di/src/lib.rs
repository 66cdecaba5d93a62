//! Alias-based dependency injection. Definitions registered in a
//! [Container](container::Container) describe how to build values, while
//! [Constructible](descriptor::Constructible) types describe their own constructor parameters, so
//! dependencies get wired automatically.

pub mod arguments;
pub mod callable;
pub mod container;
pub mod definition;
pub mod descriptor;
mod error;
pub mod instance;
pub mod pool_storage;
pub mod resolver;
pub mod value;

pub use error::{ArgumentError, ContainerError};

#[cfg(feature = "derive")]
pub use wireup_di_derive::Constructible;
