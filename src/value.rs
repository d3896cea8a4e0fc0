//! Type-erased values passed between the resolver, registry and factory.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// A resolved dependency value, shared behind an `Arc` for cheap cloning.
pub type Value = Arc<dyn Any + Send + Sync>;

/// An object under construction, as allocated and returned by the factory.
pub type Instance = Box<dyn Any>;

/// Wraps a concrete value into a type-erased [`Value`].
pub fn value_of<T: Send + Sync + 'static>(value: T) -> Value {
    Arc::new(value)
}

/// Downcasts a [`Value`] to a concrete type.
///
/// Fails with [`DiError::TypeMismatch`] naming the expected type, which the
/// factory surfaces as a dependency error with member context.
///
/// # Examples
///
/// ```rust
/// use forge_di::value::{value_of, cast};
///
/// let v = value_of(8080u16);
/// let port = cast::<u16>(&v).unwrap();
/// assert_eq!(*port, 8080);
/// assert!(cast::<String>(&v).is_err());
/// ```
pub fn cast<T: Send + Sync + 'static>(value: &Value) -> DiResult<Arc<T>> {
    value
        .clone()
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>().to_string()))
}
