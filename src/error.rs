//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Every failure the container can report during scanning, resolution,
/// instantiation or autowiring. All variants are fatal to the operation
/// that raised them; nothing is retried internally.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::DiError;
///
/// let not_found = DiError::NoImplementationFound { contract: "dyn app::Mailer" };
/// assert_eq!(
///     not_found.to_string(),
///     "No implementation found for dyn app::Mailer"
/// );
///
/// let circular = DiError::Circular(vec!["A", "B", "A"]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// No registered component declares the requested contract
    #[error("No implementation found for {contract}")]
    NoImplementationFound { contract: &'static str },

    /// Several components declare the contract and the name tie-break did not pick one
    #[error(
        "There are {count} implementations of {contract}; expected a single implementation \
         or a qualifier to resolve the conflict"
    )]
    AmbiguousImplementation { contract: &'static str, count: usize },

    /// The zero-argument constructor failed or panicked
    #[error("Failed to instantiate {component}: {cause}")]
    InstantiationFailed { component: &'static str, cause: String },

    /// The type scanner could not produce the component list
    #[error("Component scan failed: {0}")]
    ScanFailure(String),

    /// Autowiring reached a component that is already being wired (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),

    /// Maximum autowiring depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),

    /// The key does not name a registered component
    #[error("Unknown component: {0}")]
    UnknownComponent(&'static str),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
