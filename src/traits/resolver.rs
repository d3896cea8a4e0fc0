//! Resolver trait for dependency resolution during injection.

use crate::error::DiResult;
use crate::value::Value;

/// External component that maps an entry name to a value.
///
/// The factory calls this for every property, constructor parameter and
/// method parameter it injects; each call may recursively trigger further
/// resolution and instance construction inside the resolver. The factory
/// performs no caching of its own, so identical entry names produce
/// independent calls.
///
/// Implementations report a missing entry with [`DiError::NotFound`]; the
/// factory wraps that into a dependency error naming the type and member
/// being injected. [`DiError::Dependency`] and [`DiError::Definition`]
/// returned here propagate unchanged.
///
/// [`DiError::NotFound`]: crate::DiError::NotFound
/// [`DiError::Dependency`]: crate::DiError::Dependency
/// [`DiError::Definition`]: crate::DiError::Definition
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use forge_di::{DiError, DiResult, Resolver};
/// use forge_di::value::{value_of, Value};
///
/// struct FixedResolver(HashMap<String, Value>);
///
/// impl Resolver for FixedResolver {
///     fn resolve(&self, entry_name: &str, _lazy: bool) -> DiResult<Value> {
///         self.0
///             .get(entry_name)
///             .cloned()
///             .ok_or_else(|| DiError::NotFound(entry_name.to_string()))
///     }
/// }
///
/// let mut entries = HashMap::new();
/// entries.insert("app.port".to_string(), value_of(8080u16));
/// let resolver = FixedResolver(entries);
///
/// assert!(resolver.resolve("app.port", false).is_ok());
/// assert!(resolver.resolve("missing", false).is_err());
/// ```
pub trait Resolver: Send + Sync {
    /// Resolves an entry by name.
    ///
    /// When `lazy` is set the caller asks for a deferred-resolution handle
    /// instead of an eager value; what that handle looks like is the
    /// resolver's business, the factory only forwards the flag from the
    /// property injection that requested it.
    fn resolve(&self, entry_name: &str, lazy: bool) -> DiResult<Value>;
}
