//! Instance factory: turns a class definition into a live, injected object.

use std::any::Any;
use std::sync::Arc;

use crate::definition::{ClassDefinition, ConstructorInjection, MethodInjection, ParameterInjection, PropertyInjection};
use crate::error::{DiError, DiResult};
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::traits::Resolver;
use crate::value::{Instance, Value};

#[cfg(feature = "smallvec")]
type ArgBuf = smallvec::SmallVec<[Value; 4]>;
#[cfg(not(feature = "smallvec"))]
type ArgBuf = Vec<Value>;

/// Factory responsible for instantiating classes from their definitions.
///
/// Construction runs as a linear sequence: allocate a bare instance, inject
/// properties, inject the constructor, inject methods. Properties go first
/// because their values may serve as implicit context during construction;
/// methods go last because they assume a fully constructed object. Every
/// dependency lookup goes through the [`Resolver`] the factory was built
/// with, which may recurse into further construction. The factory itself
/// holds no cache and performs no memoization.
pub struct Factory {
    resolver: Arc<dyn Resolver>,
    registry: Arc<TypeRegistry>,
}

impl Factory {
    pub fn new(resolver: Arc<dyn Resolver>, registry: Arc<TypeRegistry>) -> Self {
        Self { resolver, registry }
    }

    /// Creates and fully injects an instance described by `definition`.
    ///
    /// Fails with a dependency error when the target type is unknown or not
    /// instantiable, and with a definition error when the injection metadata
    /// is structurally insufficient (missing parameters, missing entry
    /// names, unknown members).
    pub fn create_instance(&self, definition: &ClassDefinition) -> DiResult<Instance> {
        let class_name = definition.class_name();
        let descriptor = self.registry.get(class_name).ok_or_else(|| {
            DiError::dependency(format!("{} is not instantiable", class_name))
        })?;
        if !descriptor.is_instantiable() {
            return Err(DiError::dependency(format!(
                "{} is not instantiable",
                class_name
            )));
        }

        // Bare allocation, no constructor logic runs here.
        let mut instance = descriptor.allocate()?;

        if let Err(error) = self.inject_all(instance.as_mut(), descriptor, definition) {
            // Dependency and definition errors pass through verbatim; only
            // unexpected resolution failures pick up class context here.
            if error.is_terminal() {
                return Err(error);
            }
            let message = format!(
                "Error while injecting dependencies into {}: {}",
                class_name, error
            );
            return Err(DiError::wrap(message, error));
        }

        Ok(instance)
    }

    fn inject_all(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        definition: &ClassDefinition,
    ) -> DiResult<()> {
        self.inject_properties(instance, descriptor, definition.property_injections())?;
        self.inject_constructor(instance, descriptor, definition.constructor_injection())?;
        self.inject_methods(instance, descriptor, definition.method_injections())
    }

    fn inject_properties(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        injections: &[PropertyInjection],
    ) -> DiResult<()> {
        for injection in injections {
            self.inject_property(instance, descriptor, injection)?;
        }
        Ok(())
    }

    fn inject_property(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        injection: &PropertyInjection,
    ) -> DiResult<()> {
        let class = descriptor.type_name();
        let property = injection.property_name();

        if !descriptor.has_field(property) {
            return Err(DiError::definition(format!(
                "{}::{} does not exist",
                class, property
            )));
        }

        let Some(entry_name) = injection.entry_name() else {
            return Err(DiError::definition(format!(
                "{}::{} has no entry name defined",
                class, property
            )));
        };

        let value = match self.resolver.resolve(entry_name, injection.is_lazy()) {
            Ok(value) => value,
            Err(error) if error.is_terminal() => return Err(error),
            Err(error) => {
                let message = format!(
                    "Error while injecting '{}' in {}::{}: {}",
                    entry_name, class, property, error
                );
                return Err(DiError::wrap(message, error));
            }
        };

        descriptor.set_field(instance, property, value)
    }

    fn inject_constructor(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        injection: Option<&ConstructorInjection>,
    ) -> DiResult<()> {
        // No declared constructor, nothing to check or invoke.
        let Some(constructor) = descriptor.constructor() else {
            return Ok(());
        };

        let parameters = injection.map(|c| c.parameters()).unwrap_or(&[]);
        let required = constructor.required_parameters();
        if parameters.len() < required {
            return Err(DiError::definition(format!(
                "The constructor of {} takes {} parameters, {} defined",
                descriptor.type_name(),
                required,
                parameters.len()
            )));
        }

        if parameters.is_empty() {
            return constructor.invoke(instance, &[]);
        }

        let context = format!("the constructor of {}", descriptor.type_name());
        let args = self.resolve_arguments(parameters, &context)?;
        constructor.invoke(instance, &args)
    }

    fn inject_methods(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        injections: &[MethodInjection],
    ) -> DiResult<()> {
        for injection in injections {
            self.inject_method(instance, descriptor, injection)?;
        }
        Ok(())
    }

    fn inject_method(
        &self,
        instance: &mut dyn Any,
        descriptor: &TypeDescriptor,
        injection: &MethodInjection,
    ) -> DiResult<()> {
        let class = descriptor.type_name();
        let method_name = injection.method_name();

        let Some(method) = descriptor.method(method_name) else {
            return Err(DiError::definition(format!(
                "{}::{} does not exist",
                class, method_name
            )));
        };

        let parameters = injection.parameters();
        let required = method.required_parameters();
        if parameters.len() < required {
            return Err(DiError::definition(format!(
                "{}::{} takes {} parameters, {} defined",
                class,
                method_name,
                required,
                parameters.len()
            )));
        }

        if parameters.is_empty() {
            return method.invoke(instance, &[]);
        }

        let context = format!("{}::{}", class, method_name);
        let args = self.resolve_arguments(parameters, &context)?;
        method.invoke(instance, &args)
    }

    fn resolve_arguments(
        &self,
        parameters: &[ParameterInjection],
        context: &str,
    ) -> DiResult<ArgBuf> {
        let mut args = ArgBuf::new();
        for parameter in parameters {
            let value = if let Some(entry_name) = parameter.entry_name() {
                self.resolver.resolve(entry_name, false)?
            } else if let Some(literal) = parameter.literal() {
                literal.clone()
            } else {
                return Err(DiError::definition(format!(
                    "The parameter '{}' of {} has no entry or value defined",
                    parameter.parameter_name(),
                    context
                )));
            };
            args.push(value);
        }
        Ok(args)
    }
}
