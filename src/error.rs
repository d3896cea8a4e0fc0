//! Error types for definition merging and instance construction.

use std::fmt;
use std::sync::Arc;

/// Errors produced while resolving definitions and building instances.
///
/// Two of these kinds carry the core contract: [`DiError::Definition`] signals
/// a configuration/authoring bug in the supplied metadata, while
/// [`DiError::Dependency`] signals a runtime resolution failure. The remaining
/// variants originate at the resolver boundary and are wrapped into
/// `Dependency` with added context before they leave the factory.
///
/// # Examples
///
/// ```rust
/// use forge_di::DiError;
///
/// let not_found = DiError::NotFound("db.connection".to_string());
/// let definition = DiError::definition("App::logger has no entry name defined");
/// let dependency = DiError::dependency("App is not instantiable");
///
/// // All errors implement Display
/// println!("Error: {}", not_found);
/// println!("Error: {}", definition);
/// println!("Error: {}", dependency);
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No entry registered under this name (reported by the resolver)
    NotFound(String),
    /// Malformed or incomplete injection metadata
    Definition(String),
    /// A dependency could not be resolved, optionally wrapping the underlying failure
    Dependency {
        /// Human-readable description naming the type and member involved
        message: String,
        /// The underlying resolver failure, when one was wrapped
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
    /// A value or instance failed to downcast to the expected type
    TypeMismatch(String),
}

impl DiError {
    /// Creates a [`DiError::Definition`] from any message.
    pub fn definition(message: impl Into<String>) -> Self {
        DiError::Definition(message.into())
    }

    /// Creates a [`DiError::Dependency`] without an underlying cause.
    pub fn dependency(message: impl Into<String>) -> Self {
        DiError::Dependency {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a [`DiError::Dependency`] wrapping an underlying failure.
    ///
    /// The wrapped error stays reachable through [`std::error::Error::source`]
    /// for diagnostics.
    pub fn wrap(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DiError::Dependency {
            message: message.into(),
            source: Some(Arc::new(cause)),
        }
    }

    /// Whether this error is one of the two contract kinds that are re-raised
    /// verbatim (never re-wrapped) by the factory.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DiError::Definition(_) | DiError::Dependency { .. })
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Entry not found: {}", name),
            DiError::Definition(msg) => write!(f, "Definition error: {}", msg),
            DiError::Dependency { message, .. } => write!(f, "Dependency error: {}", message),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Dependency {
                source: Some(cause),
                ..
            } => {
                let cause: &(dyn std::error::Error + 'static) = cause.as_ref();
                Some(cause)
            }
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout forge-di.
pub type DiResult<T> = Result<T, DiError>;
