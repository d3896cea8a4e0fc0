//! Injection metadata attached to class definitions.
//!
//! These are read-only value objects assembled by definition loaders. The
//! factory walks them in declared order; the merger concatenates and fills
//! them without ever overwriting fields a higher-priority source already set.

use std::fmt;

use crate::value::Value;

/// Describes how one formal parameter of a constructor or method is supplied.
///
/// A parameter is satisfied either by resolving `entry_name` through the
/// container or by a literal value. A parameter with neither is unresolvable
/// and makes construction fail with a definition error.
#[derive(Clone)]
pub struct ParameterInjection {
    parameter_name: String,
    entry_name: Option<String>,
    value: Option<Value>,
}

impl ParameterInjection {
    /// Creates an unresolvable parameter; chain [`with_entry`](Self::with_entry)
    /// or [`with_value`](Self::with_value) to make it usable.
    pub fn new(parameter_name: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            entry_name: None,
            value: None,
        }
    }

    /// Shorthand for a parameter resolved through the container.
    pub fn entry(parameter_name: impl Into<String>, entry_name: impl Into<String>) -> Self {
        Self::new(parameter_name).with_entry(entry_name)
    }

    /// Sets the container entry this parameter resolves to.
    pub fn with_entry(mut self, entry_name: impl Into<String>) -> Self {
        self.entry_name = Some(entry_name.into());
        self
    }

    /// Sets a literal value, used when no entry name is present.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn entry_name(&self) -> Option<&str> {
        self.entry_name.as_deref()
    }

    pub fn literal(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether either an entry name or a literal is set.
    pub fn is_resolvable(&self) -> bool {
        self.entry_name.is_some() || self.value.is_some()
    }

    /// Fills unset fields from a lower-priority source without overwriting.
    pub(crate) fn fill_from(&mut self, other: ParameterInjection) {
        if self.entry_name.is_none() {
            self.entry_name = other.entry_name;
        }
        if self.value.is_none() {
            self.value = other.value;
        }
    }
}

impl fmt::Debug for ParameterInjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterInjection")
            .field("parameter_name", &self.parameter_name)
            .field("entry_name", &self.entry_name)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}

/// Describes a field assignment performed before the constructor runs.
#[derive(Debug, Clone)]
pub struct PropertyInjection {
    property_name: String,
    entry_name: Option<String>,
    lazy: bool,
}

impl PropertyInjection {
    pub fn new(property_name: impl Into<String>, entry_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            entry_name: Some(entry_name.into()),
            lazy: false,
        }
    }

    /// Creates a property injection with no entry name. Injecting it fails
    /// with a definition error; loaders produce this when a definition names
    /// a property without saying what to put in it.
    pub fn unresolved(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            entry_name: None,
            lazy: false,
        }
    }

    /// Requests a lazy handle instead of an eager value at resolution time.
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn entry_name(&self) -> Option<&str> {
        self.entry_name.as_deref()
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }
}

/// Describes a method invoked on the constructed instance, with its arguments.
#[derive(Debug, Clone)]
pub struct MethodInjection {
    method_name: String,
    parameters: Vec<ParameterInjection>,
}

impl MethodInjection {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter in declared order.
    pub fn with_parameter(mut self, parameter: ParameterInjection) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn parameters(&self) -> &[ParameterInjection] {
        &self.parameters
    }
}

/// Describes the arguments passed to the constructor.
///
/// Kept separate from [`MethodInjection`]: a class owns zero or one of these,
/// and merging fills parameters position-by-position instead of concatenating.
#[derive(Debug, Clone, Default)]
pub struct ConstructorInjection {
    parameters: Vec<ParameterInjection>,
}

impl ConstructorInjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, parameter: ParameterInjection) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(&self) -> &[ParameterInjection] {
        &self.parameters
    }

    /// Merges a lower-priority constructor injection into this one.
    ///
    /// Positions present on both sides keep their own fields and only fill
    /// what is unset; extra trailing positions from the other side are
    /// appended.
    pub(crate) fn merge(&mut self, other: ConstructorInjection) {
        fill_parameters(&mut self.parameters, other.parameters);
    }
}

pub(crate) fn fill_parameters(
    mine: &mut Vec<ParameterInjection>,
    theirs: Vec<ParameterInjection>,
) {
    for (index, parameter) in theirs.into_iter().enumerate() {
        match mine.get_mut(index) {
            Some(existing) => existing.fill_from(parameter),
            None => mine.push(parameter),
        }
    }
}
