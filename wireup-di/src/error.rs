use crate::instance::ErrorPtr;
use itertools::Itertools;
use thiserror::Error;

/// Errors related to resolving and creating instances.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Dependency not found: '{0}' is neither defined nor a known constructible type")]
    DependencyNotFound(String),
    #[error("Implementation of '{alias}' is unresolvable: {implementation}")]
    Unresolvable {
        alias: String,
        implementation: String,
    },
    #[error("Cyclic dependency detected while resolving '{alias}': {}", .chain.iter().join(" -> "))]
    CyclicDependency { alias: String, chain: Vec<String> },
    #[error("Error constructing '{target}': {error}")]
    Construction { target: String, error: ErrorPtr },
    #[error("Type '{target}' does not declare method '{method}'")]
    UnknownMethod { target: String, method: String },
    #[error("Instance for '{0}' has an incompatible type")]
    IncompatibleInstance(String),
    #[error("Factory for '{alias}' failed: {error}")]
    Factory { alias: String, error: ErrorPtr },
}

/// Errors raised by constructors and methods while consuming bound arguments.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ArgumentError {
    #[error("Required parameter '{0}' has no explicit value, resolvable dependency or default")]
    Unbound(String),
    #[error("Parameter '{parameter}' expects {expected}, but got {actual}")]
    Incompatible {
        parameter: String,
        expected: String,
        actual: String,
    },
    #[error("Method receiver is not an instance of {0}")]
    IncompatibleTarget(String),
}
