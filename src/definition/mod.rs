//! Definitions: declarative descriptions of how to produce a named entry.
//!
//! A [`Definition`] is a tagged union over its variants. Merge semantics are
//! owned by the variants themselves: a [`ValueDefinition`] is terminal and
//! always wins outright, while two [`ClassDefinition`]s for the same name
//! combine their injection metadata. The merger in
//! [`source`](crate::definition::source) drives this but never decides the
//! semantics itself.

use std::fmt;

pub mod injection;
pub mod source;

pub use injection::{ConstructorInjection, MethodInjection, ParameterInjection, PropertyInjection};
pub use source::{CombinedDefinitionSource, DefinitionSource};

use crate::value::Value;

/// A definition for a named container entry.
///
/// # Examples
///
/// ```rust
/// use forge_di::{ClassDefinition, Definition, PropertyInjection};
/// use forge_di::value::value_of;
///
/// let constant = Definition::value("app.port", value_of(8080u16));
/// assert_eq!(constant.name(), "app.port");
/// assert!(constant.is_value());
///
/// let class = Definition::Class(
///     ClassDefinition::new("logger")
///         .with_property(PropertyInjection::new("out", "stdout")),
/// );
/// assert!(!class.is_value());
/// ```
#[derive(Debug, Clone)]
pub enum Definition {
    /// An immutable constant; terminal during merging.
    Value(ValueDefinition),
    /// A class to instantiate with injected dependencies.
    Class(ClassDefinition),
}

impl Definition {
    /// Convenience constructor for a value definition.
    pub fn value(name: impl Into<String>, value: Value) -> Self {
        Definition::Value(ValueDefinition::new(name, value))
    }

    /// The entry name this definition describes.
    pub fn name(&self) -> &str {
        match self {
            Definition::Value(v) => v.name(),
            Definition::Class(c) => c.name(),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Definition::Value(_))
    }

    pub fn as_value(&self) -> Option<&ValueDefinition> {
        match self {
            Definition::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDefinition> {
        match self {
            Definition::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Merges a lower-priority definition into this one.
    ///
    /// Dispatches on the variant pair: class definitions combine their
    /// injection metadata, everything else keeps the higher-priority side
    /// untouched. The merger short-circuits on value definitions before this
    /// is ever called with one on the left.
    pub fn merge(&mut self, other: Definition) {
        if let (Definition::Class(mine), Definition::Class(theirs)) = (self, other) {
            mine.merge(theirs);
        }
    }
}

/// An immutable constant bound to an entry name.
#[derive(Clone)]
pub struct ValueDefinition {
    name: String,
    value: Value,
}

impl ValueDefinition {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constant value, shared with the definition.
    pub fn get(&self) -> Value {
        self.value.clone()
    }
}

impl fmt::Debug for ValueDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Describes a class to instantiate: target type name plus structured
/// injection metadata for properties, the constructor and methods.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    name: String,
    class_name: Option<String>,
    constructor: Option<ConstructorInjection>,
    properties: Vec<PropertyInjection>,
    methods: Vec<MethodInjection>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: None,
            constructor: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the target type name when it differs from the entry name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorInjection) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_property(mut self, property: PropertyInjection) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: MethodInjection) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target type name, falling back to the entry name when unset.
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or(&self.name)
    }

    pub fn constructor_injection(&self) -> Option<&ConstructorInjection> {
        self.constructor.as_ref()
    }

    pub fn property_injections(&self) -> &[PropertyInjection] {
        &self.properties
    }

    pub fn method_injections(&self) -> &[MethodInjection] {
        &self.methods
    }

    /// Merges a lower-priority class definition into this one.
    ///
    /// Fills the class name if unset, merges constructors parameter-by-
    /// parameter, and concatenates property and method injection lists in
    /// source order.
    pub fn merge(&mut self, other: ClassDefinition) {
        if self.class_name.is_none() {
            self.class_name = other.class_name;
        }
        if let Some(theirs) = other.constructor {
            match &mut self.constructor {
                Some(mine) => mine.merge(theirs),
                slot => *slot = Some(theirs),
            }
        }
        self.properties.extend(other.properties);
        self.methods.extend(other.methods);
    }
}
